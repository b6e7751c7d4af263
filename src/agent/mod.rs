//! Agent system for task execution with tool calling.
//!
//! Provides LLM agents that use the question bank, price feed and code
//! review tools, plus the tool layer shared with the MCP server and HTTP API.

mod runner;
mod tools;

pub use runner::{Agent, AgentKind, AgentResponse, ToolCallRecord};
pub use tools::{
    parse_tool_args, parse_tool_call, tool_definitions, tool_specs, AnswerResponse,
    QuestionsResponse, RelatedQuestion, ToolCall, ToolContext, ToolSpec, UploadOutcome,
    DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT,
};

//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::config::Prompts;
use crate::error::{PrepdeskError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Which assistant persona to run, each with its own prompt and tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Interview,
    Crypto,
    Review,
}

impl AgentKind {
    /// Tools this agent may call.
    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            AgentKind::Interview => &[
                "get_interview_questions",
                "get_answer",
                "submit_feedback",
                "upload_custom_question",
                "import_questions",
            ],
            AgentKind::Crypto => &["get_bitcoin_price"],
            AgentKind::Review => &["review_code"],
        }
    }

    /// Unrendered system prompt for this agent.
    pub fn system_prompt<'a>(&self, prompts: &'a Prompts) -> &'a str {
        match self {
            AgentKind::Interview => &prompts.interview.system,
            AgentKind::Crypto => &prompts.crypto.system,
            AgentKind::Review => &prompts.code_review.system,
        }
    }

    fn tools(&self) -> Vec<ChatCompletionTool> {
        let allowed = self.tool_names();
        tool_definitions()
            .into_iter()
            .filter(|t| allowed.contains(&t.function.name.as_str()))
            .collect()
    }
}

impl std::str::FromStr for AgentKind {
    type Err = PrepdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "interview" => Ok(AgentKind::Interview),
            "crypto" | "bitcoin" => Ok(AgentKind::Crypto),
            "review" | "code-review" => Ok(AgentKind::Review),
            _ => Err(PrepdeskError::InvalidInput(format!("Unknown agent kind: {}", s))),
        }
    }
}

/// Agent that can use tools to work with the question bank and price feed.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    kind: AgentKind,
    tools: Arc<ToolContext>,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create an agent of the given kind using the built-in or custom prompts.
    pub fn new(
        kind: AgentKind,
        tools: Arc<ToolContext>,
        prompts: &Prompts,
        model: &str,
    ) -> Result<Self> {
        let system_prompt =
            prompts.render_with_custom(kind.system_prompt(prompts), &HashMap::new());

        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            kind,
            tools,
            max_iterations: 15,
            system_prompt,
        })
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the agent with a user task.
    pub async fn run(&self, task: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| PrepdeskError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(task.to_string())
                .build()
                .map_err(|e| PrepdeskError::Agent(e.to_string()))?
                .into(),
        ];

        let tools = self.kind.tools();
        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(PrepdeskError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tools.clone())
                .build()
                .map_err(|e| PrepdeskError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| PrepdeskError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| PrepdeskError::Agent("No response from model".to_string()))?;

            let tool_calls = match choice.message.tool_calls {
                Some(ref calls) if !calls.is_empty() => calls,
                _ => {
                    return Ok(AgentResponse {
                        content: choice.message.content.clone().unwrap_or_default(),
                        tool_calls: tool_calls_made,
                        iterations,
                    })
                }
            };

            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| PrepdeskError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| PrepdeskError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }
    }

    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = if !self.kind.tool_names().contains(&name.as_str()) {
            format!("Tool error: {} is not available to this agent", name)
        } else {
            match parse_tool_call(name, arguments) {
                Ok(tool) => match self.tools.execute(&tool).await {
                    Ok(output) => output,
                    Err(e) => format!("Tool error: {}", e),
                },
                Err(e) => format!("Failed to parse tool call: {}", e),
            }
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

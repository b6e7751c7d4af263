//! MCP tool definitions for Prepdesk.

use super::protocol::Tool;
use crate::agent::tool_specs;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    tool_specs()
        .into_iter()
        .map(|tool| Tool {
            name: tool.name.to_string(),
            description: tool.description.to_string(),
            input_schema: tool.input_schema,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_have_object_schemas() {
        let tools = get_tools();
        assert_eq!(tools.len(), 7);
        for tool in &tools {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }
}

//! Prompt templates for the Prepdesk agents.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub interview: AgentPrompt,
    pub crypto: AgentPrompt,
    pub code_review: AgentPrompt,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// System instructions for one agent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentPrompt {
    pub system: String,
}

impl AgentPrompt {
    fn new(system: &str) -> Self {
        Self {
            system: system.to_string(),
        }
    }
}

const INTERVIEW_SYSTEM: &str = r#"You are a frontend interview coach. You help the user prepare for frontend engineering interviews.

Workflow:
1. Use get_interview_questions to fetch questions for the requested skill level (junior, mid-level or senior) and technologies
2. Present the questions clearly, one per line, with their IDs
3. When the user asks for an answer, use get_answer with the question ID
4. When the user rates a question, use submit_feedback with a rating from 1 to 5
5. Use upload_custom_question or import_questions when the user wants to add to the question bank

Keep explanations practical and point out common follow-up questions interviewers ask."#;

const CRYPTO_SYSTEM: &str = r#"You are a cryptocurrency assistant specializing in Bitcoin price information.

When responding:
- Always provide the price in USD unless another currency is specified
- Include the timestamp of when the price was last updated
- If the currency is not supported, inform the user and default to USD
- Keep responses concise but include price, currency, and last updated time
- Use get_bitcoin_price to fetch current Bitcoin price data"#;

const CODE_REVIEW_SYSTEM: &str = r#"You are a code reviewer for JavaScript and TypeScript.

Use review_code on the code you are given, then explain each reported issue with its line number and a suggested fix. If the language is not supported, say so and do not invent findings."#;

impl Prompts {
    fn builtin() -> Self {
        Self {
            interview: AgentPrompt::new(INTERVIEW_SYSTEM),
            crypto: AgentPrompt::new(CRYPTO_SYSTEM),
            code_review: AgentPrompt::new(CODE_REVIEW_SYSTEM),
            variables: HashMap::new(),
        }
    }

    /// Load prompts, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Self::builtin();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            for (file, slot) in [
                ("interview.toml", &mut prompts.interview),
                ("crypto.toml", &mut prompts.crypto),
                ("code_review.toml", &mut prompts.code_review),
            ] {
                let path = custom_path.join(file);
                if path.exists() {
                    let content = std::fs::read_to_string(&path)?;
                    *slot = toml::from_str(&content)?;
                }
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render with custom config variables. Provided variables win.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

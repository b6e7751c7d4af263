//! Configuration module for Prepdesk.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompt, Prompts};
pub use settings::{
    AgentSettings, DatabaseSettings, GeneralSettings, PriceFeedSettings, PromptSettings,
    RetrievalSettings, Settings,
};

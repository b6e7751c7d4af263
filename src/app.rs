//! Application wiring for Prepdesk.
//!
//! Opens the question store and builds the shared tool context used by the
//! CLI commands, the agent, the MCP server and the HTTP API.

use crate::agent::ToolContext;
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::price::PriceClient;
use crate::store::{QuestionStore, SqliteQuestionStore};
use std::sync::Arc;
use tracing::info;

/// Everything a command needs, built once from [`Settings`].
pub struct App {
    settings: Settings,
    prompts: Prompts,
    store: Arc<dyn QuestionStore>,
    tools: Arc<ToolContext>,
}

impl App {
    /// Open the SQLite store at the configured path.
    pub fn new(settings: Settings) -> Result<Self> {
        let store: Arc<dyn QuestionStore> =
            Arc::new(SqliteQuestionStore::new(&settings.sqlite_path())?);
        info!("Opened question store at {}", settings.sqlite_path().display());
        Self::with_store(settings, store)
    }

    /// Build around an existing store.
    pub fn with_store(settings: Settings, store: Arc<dyn QuestionStore>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let price = PriceClient::new(&settings.price_feed)?;
        let tools = Arc::new(ToolContext::new(
            Arc::clone(&store),
            price,
            settings.retrieval.related_limit,
        ));

        Ok(Self {
            settings,
            prompts,
            store,
            tools,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    pub fn store(&self) -> Arc<dyn QuestionStore> {
        Arc::clone(&self.store)
    }

    pub fn tools(&self) -> Arc<ToolContext> {
        Arc::clone(&self.tools)
    }
}

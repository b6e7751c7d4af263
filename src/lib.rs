//! Prepdesk - Frontend interview preparation
//!
//! A local-first question bank for frontend interview practice.
//!
//! # Overview
//!
//! Prepdesk allows you to:
//! - Retrieve interview questions by skill level and technology, ranked by rating
//! - Rate questions and let the ratings steer future retrieval
//! - Import question banks from JSON or CSV files
//! - Drive the same tools from an LLM agent, an MCP client or an HTTP API
//!
//! # Architecture
//!
//! - `store` - Question persistence (SQLite)
//! - `retrieval` - Question selection with a built-in fallback pool
//! - `feedback` - Rating submission
//! - `import` - JSON/CSV question import
//! - `review` - Rule-based JavaScript/TypeScript review
//! - `price` - Bitcoin price feed client
//! - `agent` - Tool layer and LLM tool-calling loop
//! - `mcp` - MCP server over stdio
//! - `app` - Wiring from settings to tools
//!
//! # Example
//!
//! ```rust,no_run
//! use prepdesk::app::App;
//! use prepdesk::config::Settings;
//! use prepdesk::store::Difficulty;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::new(Settings::load()?)?;
//!
//!     let response = app
//!         .tools()
//!         .interview_questions(Difficulty::Junior, &["React".to_string()], 5)
//!         .await;
//!     for q in response.questions {
//!         println!("{}: {}", q.id, q.question);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod import;
pub mod mcp;
pub mod openai;
pub mod price;
pub mod retrieval;
pub mod review;
pub mod store;

pub use error::{PrepdeskError, Result};

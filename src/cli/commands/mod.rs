//! CLI command implementations.

mod agent;
mod config;
mod feedback;
mod import;
mod init;
mod mcp;
mod price;
mod profile;
mod questions;
mod review;
mod serve;

pub use agent::run_agent;
pub use config::run_config;
pub use feedback::run_feedback;
pub use import::run_import;
pub use init::run_init;
pub use mcp::run_mcp;
pub use price::run_price;
pub use profile::{run_profile, run_training};
pub use questions::{run_answer, run_questions};
pub use review::run_review;
pub use serve::run_serve;

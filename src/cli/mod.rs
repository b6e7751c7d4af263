//! CLI module for Prepdesk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand, ValueEnum};

/// Prepdesk - Frontend interview preparation
///
/// Serves rated interview questions from a local SQLite question bank, learns
/// from feedback, and exposes the same tools to LLM agents over MCP and HTTP.
#[derive(Parser, Debug)]
#[command(name = "prepdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Prepdesk and create the question database
    Init,

    /// Get interview questions for a skill level
    Questions {
        /// Skill level: junior, mid-level or senior (defaults to the preferred level)
        level: Option<String>,

        /// Technology filter (repeatable)
        #[arg(short, long = "tech")]
        technologies: Vec<String>,

        /// Number of questions (defaults to retrieval.default_count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show the answer for a question
    Answer {
        /// Question ID
        id: String,
    },

    /// Rate a question from 1 to 5
    Feedback {
        /// Question ID
        id: String,

        /// Rating from 1 to 5
        rating: u8,

        /// Optional comment
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show or update the local user profile and recent activity
    Profile {
        /// Set the preferred skill level
        #[arg(short, long)]
        level: Option<String>,

        /// Number of recent interactions to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Print captured training records as JSON
    Training {
        /// Maximum number of records
        #[arg(short = 'n', long, default_value = "100")]
        limit: usize,
    },

    /// Import questions from a JSON or CSV file
    Import {
        /// Path to the file
        file: String,
    },

    /// Show the current Bitcoin price
    Price {
        /// Currency code
        #[arg(default_value = "usd")]
        currency: String,
    },

    /// Review a JavaScript or TypeScript file
    Review {
        /// Path to the file
        file: String,

        /// Language (inferred from the file extension when omitted)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Run an AI agent on a task
    Agent {
        /// The task for the agent (e.g., "Quiz me on senior React questions")
        task: String,

        /// Which agent to run
        #[arg(short, long, value_enum, default_value_t = AgentChoice::Interview)]
        kind: AgentChoice,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Start MCP server for AI assistant integration
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentChoice {
    Interview,
    Crypto,
    Review,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

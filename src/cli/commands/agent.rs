//! Agent command implementation.

use crate::agent::{Agent, AgentKind};
use crate::app::App;
use crate::cli::output::truncate;
use crate::cli::preflight::{self, Operation};
use crate::cli::{AgentChoice, Output};
use crate::config::Settings;
use anyhow::Result;

impl From<AgentChoice> for AgentKind {
    fn from(choice: AgentChoice) -> Self {
        match choice {
            AgentChoice::Interview => AgentKind::Interview,
            AgentChoice::Crypto => AgentKind::Crypto,
            AgentChoice::Review => AgentKind::Review,
        }
    }
}

/// Run the agent command.
pub async fn run_agent(
    task: &str,
    kind: AgentChoice,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Agent) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());
    let max_iterations = settings.agent.max_iterations;
    let app = App::new(settings)?;

    let agent = Agent::new(kind.into(), app.tools(), app.prompts(), &model)?
        .with_max_iterations(max_iterations);

    let spinner = Output::spinner("Agent working...");
    let result = agent.run(task).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", response.iterations));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Agent failed: {}", e));
            Err(e.into())
        }
    }
}

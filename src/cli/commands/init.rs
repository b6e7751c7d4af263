//! Init command - interactive first-run setup.

use crate::app::App;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub async fn run_init(settings: Settings) -> anyhow::Result<()> {
    Output::header("Prepdesk Setup");
    println!();

    // Step 1: Directories
    println!("{}", style("Step 1: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 2: Database
    println!("{}", style("Step 2: Question database").bold().cyan());
    println!();

    let app = App::new(settings.clone())?;
    let count = app.store().question_count().await?;
    Output::success(&format!("Database ready: {}", settings.sqlite_path().display()));
    Output::kv("Stored questions", &count.to_string());
    if count == 0 {
        Output::info("The built-in question pool is used until you import your own.");
    }

    println!();

    // Step 3: API key
    println!("{}", style("Step 3: Checking API configuration").bold().cyan());
    println!();

    if std::env::var("OPENAI_API_KEY").is_err() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!("  Only the 'agent' command needs it. Everything else works offline.");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 4: Config file
    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Get some questions", style("prepdesk questions junior -t React").cyan());
    println!("  {} Import your own bank", style("prepdesk import questions.json").cyan());
    println!("  {} Practice with an agent", style("prepdesk agent \"Quiz me\"").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

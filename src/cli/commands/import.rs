//! Import command implementation.

use crate::app::App;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Run the import command.
pub async fn run_import(file: &str, settings: Settings) -> Result<()> {
    let path = Path::new(file);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file)
        .to_string();

    let app = App::new(settings)?;
    let spinner = Output::spinner(&format!("Importing {}...", filename));
    let outcome = app.tools().import_questions(&filename, &content).await;
    spinner.finish_and_clear();

    if outcome.success {
        Output::success(&outcome.message);
        Output::kv("Imported", &outcome.questions_imported.to_string());
        Output::kv("Skipped", &outcome.failed_questions.to_string());
        Ok(())
    } else {
        Output::error(&outcome.message);
        bail!(outcome.message)
    }
}

//! Review command implementation.

use crate::cli::Output;
use crate::review::review_code;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the review command.
pub fn run_review(file: &str, language: Option<String>) -> Result<()> {
    let path = Path::new(file);
    let code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let language = language.unwrap_or_else(|| language_from_path(path).to_string());
    let report = review_code(&code, &language);

    Output::header(&format!("Review of {}", path.display()));
    for issue in &report.issues {
        Output::review_issue(issue);
    }
    println!();
    Output::info(&report.summary);

    Ok(())
}

fn language_from_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts" | "tsx" | "mts" | "cts") => "typescript",
        Some("js" | "jsx" | "mjs" | "cjs") => "javascript",
        _ => "unknown",
    }
}

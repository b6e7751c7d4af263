//! CLI output formatting utilities.

use crate::review::{ReviewIssue, Severity};
use crate::store::QuestionSummary;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a question summary line.
    pub fn question(index: usize, q: &QuestionSummary) {
        let marker = if q.has_detailed_answer { "" } else { " (no answer yet)" };
        println!(
            "\n{} {}{}",
            style(format!("{}.", index)).cyan().bold(),
            style(&q.question).bold(),
            style(marker).dim()
        );
        println!(
            "   {} | {} | {}",
            style(&q.id).dim(),
            q.difficulty,
            q.technologies.join(", ")
        );
    }

    /// Print a code review finding.
    pub fn review_issue(issue: &ReviewIssue) {
        let label = match issue.severity {
            Severity::Warning => style("warning").yellow().bold(),
            Severity::Info => style("info").cyan(),
        };
        let location = if issue.line == 0 {
            "file".to_string()
        } else {
            format!("line {}", issue.line)
        };
        println!("  {} {}: {}", label, style(location).dim(), issue.message);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Shorten text to at most `max_chars` characters, appending an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

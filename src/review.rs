//! Naive rule-based code review for JavaScript and TypeScript snippets.

use serde::{Deserialize, Serialize};

/// Files longer than this get a "split it up" hint.
const MAX_LINES: usize = 100;

const SUPPORTED_LANGUAGES: &[&str] = &["javascript", "typescript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// A single finding. Line 0 refers to the file as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    pub line: usize,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub issues: Vec<ReviewIssue>,
    pub summary: String,
}

/// Review `code` written in `language`.
pub fn review_code(code: &str, language: &str) -> ReviewReport {
    let normalized = language.trim().to_lowercase();
    if !SUPPORTED_LANGUAGES.contains(&normalized.as_str()) {
        return ReviewReport {
            issues: Vec::new(),
            summary: "Sorry, I cannot review this language. Please specify a supported language (e.g., JavaScript or TypeScript).".to_string(),
        };
    }

    let lines: Vec<&str> = code.split('\n').collect();
    let mut issues = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.ends_with('}') || trimmed.ends_with(']') {
            issues.push(ReviewIssue {
                line: index + 1,
                message: "Missing semicolon at end of statement".to_string(),
                severity: Severity::Warning,
            });
        }

        if line.contains("console.log") {
            issues.push(ReviewIssue {
                line: index + 1,
                message: "Console.log statements should be removed in production code".to_string(),
                severity: Severity::Info,
            });
        }
    }

    if lines.len() > MAX_LINES {
        issues.push(ReviewIssue {
            line: 0,
            message: format!(
                "Code file exceeds {} lines, consider breaking into smaller modules",
                MAX_LINES
            ),
            severity: Severity::Info,
        });
    }

    let summary = if issues.is_empty() {
        format!("No significant issues found in the {} code.", language)
    } else {
        format!("Found {} issues in the {} code.", issues.len(), language)
    };

    ReviewReport { issues, summary }
}

//! Bulk question import from JSON and CSV files.
//!
//! Records are validated one by one; invalid records are counted and skipped
//! without aborting the batch. Valid records are then written through
//! [`QuestionStore::import_questions`].

use crate::error::{PrepdeskError, Result};
use crate::store::{default_category, Difficulty, NewQuestion, QuestionStore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, instrument, warn};

/// Rating given to imported questions that do not carry one.
pub const DEFAULT_IMPORT_RATING: f64 = 4.0;

/// Questions extracted from an import file.
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub questions: Vec<NewQuestion>,
    /// Records rejected by validation.
    pub failed: usize,
}

/// Result reported back to the caller of an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub success: bool,
    pub questions_imported: usize,
    pub failed_questions: usize,
    pub message: String,
}

/// Parse an uploaded file based on its extension.
pub fn parse_file(filename: &str, content: &str) -> Result<ParsedImport> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => parse_json(content),
        "csv" => parse_csv(content),
        other => Err(PrepdeskError::Import(format!(
            "Unsupported file format: .{}. Please upload JSON or CSV files.",
            other
        ))),
    }
}

/// Parse a JSON array of questions, or an object with a `questions` array.
pub fn parse_json(content: &str) -> Result<ParsedImport> {
    let data: Value = serde_json::from_str(content)?;

    let records = match &data {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(PrepdeskError::Import(
                    "Invalid JSON format. Expected an array of questions or an object with a questions array."
                        .to_string(),
                ))
            }
        },
        _ => {
            return Err(PrepdeskError::Import(
                "Invalid JSON format. Expected an array of questions or an object with a questions array."
                    .to_string(),
            ))
        }
    };

    let mut parsed = ParsedImport::default();
    for record in records {
        match validate(RawRecord::from_json(record)) {
            Some(question) => parsed.questions.push(question),
            None => parsed.failed += 1,
        }
    }

    Ok(parsed)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    question: Option<String>,
    answer: Option<String>,
    difficulty: Option<String>,
    technologies: Option<String>,
    rating: Option<String>,
    category: Option<String>,
}

/// Parse a CSV file with a header row.
pub fn parse_csv(content: &str) -> Result<ParsedImport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    // Fail early on an unreadable header row
    reader.headers()?;

    let mut parsed = ParsedImport::default();
    for row in reader.deserialize::<CsvRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping malformed CSV row: {}", e);
                parsed.failed += 1;
                continue;
            }
        };

        let raw = RawRecord {
            question: row.question,
            answer: row.answer,
            difficulty: row.difficulty,
            technologies: row.technologies.map(|t| split_technologies(&t)).unwrap_or_default(),
            rating: row.rating.and_then(|r| r.parse().ok()),
            category: row.category,
        };

        match validate(raw) {
            Some(question) => parsed.questions.push(question),
            None => parsed.failed += 1,
        }
    }

    Ok(parsed)
}

/// Parse a file and write its valid questions to the store.
#[instrument(skip(store, content))]
pub async fn import_file(store: &dyn QuestionStore, filename: &str, content: &str) -> ImportOutcome {
    let parsed = match parse_file(filename, content) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Error processing import file {}: {}", filename, e);
            let message = match e {
                PrepdeskError::Import(msg) => msg,
                other => format!("Error processing file: {}", other),
            };
            return ImportOutcome {
                success: false,
                questions_imported: 0,
                failed_questions: 0,
                message,
            };
        }
    };

    if parsed.questions.is_empty() {
        return ImportOutcome {
            success: false,
            questions_imported: 0,
            failed_questions: parsed.failed,
            message: "No valid questions found in the uploaded file.".to_string(),
        };
    }

    let report = store.import_questions(&parsed.questions).await;
    if !report.success {
        return ImportOutcome {
            success: false,
            questions_imported: 0,
            failed_questions: parsed.failed,
            message: format!(
                "Failed to save questions: {}",
                report.error.unwrap_or_else(|| "unknown error".to_string())
            ),
        };
    }

    info!("Imported {} questions from {}", report.count, filename);

    let mut message = format!("Successfully imported {} questions.", report.count);
    if parsed.failed > 0 {
        message.push_str(&format!(
            " {} questions were skipped due to validation errors.",
            parsed.failed
        ));
    }

    ImportOutcome {
        success: true,
        questions_imported: report.count,
        failed_questions: parsed.failed,
        message,
    }
}

/// An unvalidated record from either file format.
#[derive(Debug, Default)]
struct RawRecord {
    question: Option<String>,
    answer: Option<String>,
    difficulty: Option<String>,
    technologies: Vec<String>,
    rating: Option<f64>,
    category: Option<String>,
}

impl RawRecord {
    fn from_json(value: &Value) -> Self {
        let text = |key: &str| match value.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let technologies = match value.get("technologies") {
            Some(Value::String(s)) => split_technologies(s),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|t| t.as_str())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            question: text("question"),
            answer: text("answer"),
            difficulty: text("difficulty"),
            technologies,
            rating: value.get("rating").and_then(|r| r.as_f64()),
            category: text("category"),
        }
    }
}

fn validate(raw: RawRecord) -> Option<NewQuestion> {
    let question = sanitize(raw.question.as_deref()?);
    if question.is_empty() {
        return None;
    }
    let difficulty: Difficulty = raw.difficulty?.parse().ok()?;

    Some(NewQuestion {
        question,
        answer: raw.answer.as_deref().map(sanitize).unwrap_or_default(),
        difficulty,
        technologies: raw.technologies,
        category: raw
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(default_category),
        rating: Some(raw.rating.unwrap_or(DEFAULT_IMPORT_RATING)),
    })
}

fn split_technologies(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Strip HTML tags from user supplied text.
pub fn sanitize(text: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"(?s)</?[A-Za-z][^>]*>").expect("valid tag pattern"));
    tags.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteQuestionStore;

    #[test]
    fn test_parse_json_array() {
        let content = r#"[
            {"question": "What is a Promise?", "answer": "An eventual value", "difficulty": "Junior", "technologies": ["JavaScript"]},
            {"question": "Explain reflow.", "difficulty": "senior", "technologies": "CSS, Performance", "rating": 3.5, "category": "browser"},
            {"question": "Missing difficulty"},
            {"question": "Bad difficulty", "difficulty": "guru"}
        ]"#;

        let parsed = parse_file("questions.JSON", content).unwrap();
        assert_eq!(parsed.questions.len(), 2);
        assert_eq!(parsed.failed, 2);

        let first = &parsed.questions[0];
        assert_eq!(first.difficulty, Difficulty::Junior);
        assert_eq!(first.category, "frontend");
        assert_eq!(first.rating, Some(DEFAULT_IMPORT_RATING));

        let second = &parsed.questions[1];
        assert_eq!(second.technologies, vec!["CSS", "Performance"]);
        assert_eq!(second.rating, Some(3.5));
        assert_eq!(second.category, "browser");
        assert!(second.answer.is_empty());
    }

    #[test]
    fn test_parse_json_object_with_questions() {
        let content = r#"{"questions": [{"question": "What is CORS?", "difficulty": "mid-level"}]}"#;
        let parsed = parse_json(content).unwrap();
        assert_eq!(parsed.questions.len(), 1);

        assert!(parse_json(r#"{"items": []}"#).is_err());
        assert!(parse_json("42").is_err());
    }

    #[test]
    fn test_parse_csv() {
        let content = "question,answer,difficulty,technologies,rating\n\
            What is the event loop?,It schedules tasks,junior,\"JavaScript, Node\",4.5\n\
            ,No question,junior,CSS,\n\
            Explain grid,<b>Two-dimensional</b> layout,mid-level,CSS,\n\
            Something,answer,wizard,CSS,\n";

        let parsed = parse_file("bank.csv", content).unwrap();
        assert_eq!(parsed.questions.len(), 2);
        assert_eq!(parsed.failed, 2);

        assert_eq!(parsed.questions[0].technologies, vec!["JavaScript", "Node"]);
        assert_eq!(parsed.questions[0].rating, Some(4.5));
        assert_eq!(parsed.questions[1].answer, "Two-dimensional layout");
        assert_eq!(parsed.questions[1].rating, Some(DEFAULT_IMPORT_RATING));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_file("questions.xml", "<xml/>").unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("<script>alert(1)</script>What?"), "alert(1)What?");
        assert_eq!(sanitize("  plain  "), "plain");
    }

    #[test]
    fn test_sanitize_keeps_comparisons() {
        assert_eq!(sanitize("if a < b and c > d"), "if a < b and c > d");
        assert_eq!(sanitize("Is <b>x</b> > 0?"), "Is x > 0?");
    }

    #[tokio::test]
    async fn test_import_file_writes_valid_questions() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        let content = r#"[
            {"question": "What is memoization?", "difficulty": "mid-level", "technologies": ["JavaScript"]},
            {"question": "", "difficulty": "junior"}
        ]"#;

        let outcome = import_file(&store, "bank.json", content).await;
        assert!(outcome.success);
        assert_eq!(outcome.questions_imported, 1);
        assert_eq!(outcome.failed_questions, 1);
        assert!(outcome.message.contains("1 questions were skipped"));
        assert_eq!(store.question_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_import_file_without_valid_questions() {
        let store = SqliteQuestionStore::in_memory().unwrap();

        let outcome = import_file(&store, "bank.json", "[]").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "No valid questions found in the uploaded file.");

        let outcome = import_file(&store, "bank.txt", "hello").await;
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Unsupported file format"));
    }
}

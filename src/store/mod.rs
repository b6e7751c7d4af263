//! Question store for Prepdesk.
//!
//! Persists interview questions together with the feedback, interaction history
//! and user preferences that accumulate around them. The store is the only
//! component allowed to mutate these rows; everything else goes through the
//! [`QuestionStore`] trait.

mod sqlite;

pub use sqlite::SqliteQuestionStore;

use crate::error::{PrepdeskError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty tier of a question, also used as the caller's skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Junior,
    MidLevel,
    Senior,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Junior, Difficulty::MidLevel, Difficulty::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Junior => "junior",
            Difficulty::MidLevel => "mid-level",
            Difficulty::Senior => "senior",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = PrepdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "junior" => Ok(Difficulty::Junior),
            "mid-level" => Ok(Difficulty::MidLevel),
            "senior" => Ok(Difficulty::Senior),
            _ => Err(PrepdeskError::InvalidInput(format!(
                "Unknown difficulty '{}'. Expected junior, mid-level or senior",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of interaction a user had with a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    Viewed,
    Answered,
    Skipped,
    Liked,
    Disliked,
}

impl Interaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interaction::Viewed => "viewed",
            Interaction::Answered => "answered",
            Interaction::Skipped => "skipped",
            Interaction::Liked => "liked",
            Interaction::Disliked => "disliked",
        }
    }
}

impl std::str::FromStr for Interaction {
    type Err = PrepdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "viewed" => Ok(Interaction::Viewed),
            "answered" => Ok(Interaction::Answered),
            "skipped" => Ok(Interaction::Skipped),
            "liked" => Ok(Interaction::Liked),
            "disliked" => Ok(Interaction::Disliked),
            _ => Err(PrepdeskError::InvalidInput(format!("Unknown interaction '{}'", s))),
        }
    }
}

/// An interview question stored in the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub technologies: Vec<String>,
    /// Running weighted mean of all feedback ratings.
    pub rating: f64,
    /// Number of feedback submissions folded into `rating`.
    pub rating_count: u32,
    /// How many times the question has been served to a caller.
    pub times_used: u32,
    /// Legacy counter kept for databases written by older tools. Nothing
    /// increments it; `times_used` is the live usage count.
    pub usage_count: u32,
    pub category: String,
    pub source: String,
    pub date_added: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_rated: Option<DateTime<Utc>>,
}

impl Question {
    /// Condensed view handed out by retrieval.
    pub fn summary(&self) -> QuestionSummary {
        QuestionSummary {
            id: self.id.clone(),
            question: self.question.clone(),
            difficulty: self.difficulty,
            technologies: self.technologies.clone(),
            has_detailed_answer: !self.answer.is_empty(),
        }
    }
}

/// What retrieval returns to callers: the question without its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: String,
    pub question: String,
    pub difficulty: Difficulty,
    pub technologies: Vec<String>,
    pub has_detailed_answer: bool,
}

/// A single user rating for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub question_id: String,
    /// Rating from 1 to 5 inclusive.
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-user personalization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub preferred_difficulty: Option<Difficulty>,
    pub recent_technologies: Vec<String>,
    pub last_active: DateTime<Utc>,
}

/// An entry in the append-only interaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub user_id: String,
    pub question_id: String,
    pub interaction: Interaction,
    pub timestamp: DateTime<Utc>,
}

/// A question captured for later model fine-tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    pub question_id: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub technologies: Vec<String>,
    pub date_added: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}

/// An externally supplied question (upload or bulk import).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    #[serde(default)]
    pub answer: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

pub fn default_category() -> String {
    "frontend".to_string()
}

/// Outcome of saving a custom question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuestion {
    pub id: String,
    /// False when an existing question with the same text was updated.
    pub created: bool,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub success: bool,
    pub count: usize,
    /// Index of the record that aborted the batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trait for question store implementations.
///
/// Read paths favor availability: they log storage failures and return an
/// empty or absent result. `submit_feedback` favors correctness and surfaces
/// every failure after rolling back.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Questions of the given difficulty matching any of the technologies,
    /// best rated first, then most used.
    async fn get_questions(
        &self,
        difficulty: Difficulty,
        technologies: &[String],
        limit: usize,
    ) -> Vec<Question>;

    /// Look up a single question.
    async fn get_question_by_id(&self, id: &str) -> Option<Question>;

    /// Record feedback and fold its rating into the question atomically.
    async fn submit_feedback(&self, feedback: &Feedback) -> Result<()>;

    /// Bump `times_used` for the given ids. Returns the rows touched.
    async fn update_question_stats(&self, ids: &[String]) -> usize;

    /// Insert a batch of questions in a single transaction.
    async fn import_questions(&self, questions: &[NewQuestion]) -> ImportReport;

    /// Insert a custom question, or update the one with identical text.
    async fn save_custom_question(&self, question: &NewQuestion) -> Result<SavedQuestion>;

    async fn get_user_preferences(&self, user_id: &str) -> Option<UserPreference>;

    async fn save_user_preferences(&self, preference: &UserPreference) -> Result<()>;

    /// Append to the interaction log and refresh the user's preferences.
    async fn record_interaction(
        &self,
        user_id: &str,
        question_id: &str,
        interaction: Interaction,
    ) -> Result<()>;

    /// Most recent interactions of a user, newest first.
    async fn get_interaction_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>>;

    async fn get_training_data(&self, limit: usize) -> Vec<TrainingRecord>;

    async fn question_count(&self) -> Result<usize>;
}

/// Fold a new rating into a running mean over `count` previous ratings.
pub fn weighted_rating(current: f64, count: u32, new_rating: u8) -> f64 {
    (current * count as f64 + new_rating as f64) / (count as f64 + 1.0)
}

/// Maximum number of technologies remembered per user.
pub const RECENT_TECHNOLOGIES_CAP: usize = 10;

/// Push `technologies` to the front of `recent`, dropping duplicates
/// (case-insensitive) and keeping at most [`RECENT_TECHNOLOGIES_CAP`].
pub fn merge_recent_technologies(recent: &[String], technologies: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(RECENT_TECHNOLOGIES_CAP);
    for tech in technologies.iter().chain(recent.iter()) {
        if merged.len() == RECENT_TECHNOLOGIES_CAP {
            break;
        }
        if !merged.iter().any(|t| t.eq_ignore_ascii_case(tech)) {
            merged.push(tech.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_rating() {
        let rating = weighted_rating(4.0, 9, 5);
        assert!((rating - 4.1).abs() < 1e-9);

        // First rating replaces the seed entirely
        assert_eq!(weighted_rating(0.0, 0, 3), 3.0);
        assert_eq!(weighted_rating(4.5, 0, 2), 2.0);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("junior".parse::<Difficulty>().unwrap(), Difficulty::Junior);
        assert_eq!("Mid-Level".parse::<Difficulty>().unwrap(), Difficulty::MidLevel);
        assert_eq!(" senior ".parse::<Difficulty>().unwrap(), Difficulty::Senior);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_serde() {
        let json = serde_json::to_string(&Difficulty::MidLevel).unwrap();
        assert_eq!(json, r#""mid-level""#);
        let parsed: Difficulty = serde_json::from_str(r#""senior""#).unwrap();
        assert_eq!(parsed, Difficulty::Senior);
    }

    #[test]
    fn test_merge_recent_technologies() {
        let recent = vec!["CSS".to_string(), "React".to_string()];
        let merged = merge_recent_technologies(&recent, &["react".to_string(), "Vue".to_string()]);
        assert_eq!(merged, vec!["react", "Vue", "CSS"]);

        let many: Vec<String> = (0..15).map(|i| format!("tech{}", i)).collect();
        assert_eq!(merge_recent_technologies(&[], &many).len(), RECENT_TECHNOLOGIES_CAP);
    }

    #[test]
    fn test_new_question_defaults() {
        let q: NewQuestion =
            serde_json::from_str(r#"{"question": "What is a closure?", "difficulty": "junior"}"#).unwrap();
        assert_eq!(q.category, "frontend");
        assert!(q.technologies.is_empty());
        assert!(q.answer.is_empty());
        assert_eq!(q.rating, None);
    }
}

//! Feedback submission for API consumers.
//!
//! Wraps [`QuestionStore::submit_feedback`] and turns its errors into a
//! structured result instead of propagating them.

use crate::store::{Feedback, QuestionStore};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Result of a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackOutcome {
    pub success: bool,
    pub message: String,
}

impl FeedbackOutcome {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Records user ratings against stored questions.
#[derive(Clone)]
pub struct FeedbackProcessor {
    store: Arc<dyn QuestionStore>,
}

impl FeedbackProcessor {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, comment))]
    pub async fn submit(
        &self,
        question_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> FeedbackOutcome {
        if self.store.get_question_by_id(question_id).await.is_none() {
            return FeedbackOutcome::failure(format!("Question with ID {} not found", question_id));
        }

        let feedback = Feedback {
            id: format!("feedback-{}", Uuid::new_v4()),
            question_id: question_id.to_string(),
            rating,
            comment,
            created_at: Utc::now(),
        };

        match self.store.submit_feedback(&feedback).await {
            Ok(()) => FeedbackOutcome {
                success: true,
                message: "Feedback submitted successfully".to_string(),
            },
            Err(e) => {
                warn!("Error submitting feedback for {}: {}", question_id, e);
                FeedbackOutcome::failure(format!("Failed to submit feedback: {}", e))
            }
        }
    }
}

//! Feedback command implementation.

use super::profile::{interaction_for_rating, track};
use crate::app::App;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::{bail, Result};

/// Run the feedback command.
pub async fn run_feedback(
    id: &str,
    rating: u8,
    comment: Option<String>,
    settings: Settings,
) -> Result<()> {
    if !(1..=5).contains(&rating) {
        bail!("rating must be between 1 and 5, got {}", rating);
    }

    let app = App::new(settings)?;
    let outcome = app.tools().submit_feedback(id, rating, comment).await;

    if outcome.success {
        Output::success(&outcome.message);
        track(&app, id, interaction_for_rating(rating)).await;
        if let Some(question) = app.store().get_question_by_id(id).await {
            Output::kv(
                "Rating",
                &format!("{:.2} ({} ratings)", question.rating, question.rating_count),
            );
        }
        Ok(())
    } else {
        Output::error(&outcome.message);
        bail!(outcome.message)
    }
}

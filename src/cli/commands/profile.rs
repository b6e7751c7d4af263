//! Local user profile: interaction tracking, preferences and training data.

use crate::app::App;
use crate::cli::Output;
use crate::config::Settings;
use crate::store::{Difficulty, Interaction, UserPreference};
use anyhow::Result;
use chrono::Utc;
use tracing::warn;

/// Record an interaction for the configured user. Failures are logged only.
pub(super) async fn track(app: &App, question_id: &str, interaction: Interaction) {
    let user_id = &app.settings().general.user_id;
    if let Err(e) = app
        .store()
        .record_interaction(user_id, question_id, interaction)
        .await
    {
        warn!("Failed to record {} interaction: {}", interaction.as_str(), e);
    }
}

/// Interaction logged for a rating. Ratings never nudge the question rating
/// beyond the weighted mean; this only feeds the interaction log.
pub(super) fn interaction_for_rating(rating: u8) -> Interaction {
    match rating {
        4..=5 => Interaction::Liked,
        1..=2 => Interaction::Disliked,
        _ => Interaction::Answered,
    }
}

/// Skill level from the command line, or the user's preferred level.
pub(super) async fn resolve_level(app: &App, level: Option<&str>) -> Result<Difficulty> {
    if let Some(level) = level {
        return Ok(level.parse()?);
    }

    let user_id = &app.settings().general.user_id;
    match app.store().get_user_preferences(user_id).await {
        Some(UserPreference {
            preferred_difficulty: Some(difficulty),
            ..
        }) => Ok(difficulty),
        _ => anyhow::bail!(
            "No skill level given and no preferred level saved. \
             Pass one or run 'prepdesk profile --level <level>'."
        ),
    }
}

/// Run the profile command.
pub async fn run_profile(level: Option<&str>, limit: usize, settings: Settings) -> Result<()> {
    let app = App::new(settings)?;
    let user_id = app.settings().general.user_id.clone();
    let store = app.store();

    if let Some(level) = level {
        let difficulty: Difficulty = level.parse()?;
        let preference = match store.get_user_preferences(&user_id).await {
            Some(existing) => UserPreference {
                preferred_difficulty: Some(difficulty),
                last_active: Utc::now(),
                ..existing
            },
            None => UserPreference {
                user_id: user_id.clone(),
                preferred_difficulty: Some(difficulty),
                recent_technologies: Vec::new(),
                last_active: Utc::now(),
            },
        };
        store.save_user_preferences(&preference).await?;
        Output::success(&format!("Preferred level set to {}", difficulty));
    }

    Output::header(&format!("Profile: {}", user_id));
    match store.get_user_preferences(&user_id).await {
        Some(preference) => {
            Output::kv(
                "Preferred level",
                preference
                    .preferred_difficulty
                    .map(|d| d.as_str())
                    .unwrap_or("not set"),
            );
            if !preference.recent_technologies.is_empty() {
                Output::kv("Recent technologies", &preference.recent_technologies.join(", "));
            }
            Output::kv(
                "Last active",
                &preference.last_active.format("%Y-%m-%d %H:%M").to_string(),
            );
        }
        None => Output::info("No activity recorded yet."),
    }

    let history = store.get_interaction_history(&user_id, limit).await?;
    if !history.is_empty() {
        Output::header("Recent activity");
        for record in &history {
            Output::kv(
                &record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                &format!("{} {}", record.interaction.as_str(), record.question_id),
            );
        }
    }

    Ok(())
}

/// Run the training command: dump captured training records as JSON.
pub async fn run_training(limit: usize, settings: Settings) -> Result<()> {
    let app = App::new(settings)?;
    let records = app.store().get_training_data(limit).await;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewQuestion, SqliteQuestionStore};
    use std::sync::Arc;

    fn app() -> App {
        let store = Arc::new(SqliteQuestionStore::in_memory().unwrap());
        App::with_store(Settings::default(), store).unwrap()
    }

    #[test]
    fn test_interaction_for_rating() {
        assert_eq!(interaction_for_rating(5), Interaction::Liked);
        assert_eq!(interaction_for_rating(4), Interaction::Liked);
        assert_eq!(interaction_for_rating(3), Interaction::Answered);
        assert_eq!(interaction_for_rating(1), Interaction::Disliked);
    }

    #[tokio::test]
    async fn test_resolve_level_prefers_argument() {
        let app = app();
        assert_eq!(
            resolve_level(&app, Some("Senior")).await.unwrap(),
            Difficulty::Senior
        );
        assert!(resolve_level(&app, None).await.is_err());
    }

    #[tokio::test]
    async fn test_track_sets_preferred_level() {
        let app = app();
        let saved = app
            .store()
            .save_custom_question(&NewQuestion {
                question: "What is a closure?".to_string(),
                answer: "A function with its scope".to_string(),
                difficulty: Difficulty::MidLevel,
                technologies: vec!["JavaScript".to_string()],
                category: "frontend".to_string(),
                rating: None,
            })
            .await
            .unwrap();

        track(&app, &saved.id, Interaction::Viewed).await;

        assert_eq!(resolve_level(&app, None).await.unwrap(), Difficulty::MidLevel);
        let history = app
            .store()
            .get_interaction_history("local", 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].interaction, Interaction::Viewed);
    }
}

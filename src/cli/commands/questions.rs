//! Question retrieval commands.

use super::profile::{resolve_level, track};
use crate::agent::MAX_QUESTION_COUNT;
use crate::app::App;
use crate::cli::Output;
use crate::config::Settings;
use crate::store::Interaction;
use anyhow::{bail, Result};

/// Run the questions command.
pub async fn run_questions(
    level: Option<&str>,
    technologies: &[String],
    count: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let count = count.unwrap_or(settings.retrieval.default_count);
    if count == 0 || count > MAX_QUESTION_COUNT {
        bail!("count must be between 1 and {}", MAX_QUESTION_COUNT);
    }

    let app = App::new(settings)?;
    let skill_level = resolve_level(&app, level).await?;
    let response = app
        .tools()
        .interview_questions(skill_level, technologies, count)
        .await;

    if response.questions.is_empty() {
        Output::info("No questions found.");
        return Ok(());
    }

    let filter = if technologies.is_empty() {
        String::new()
    } else {
        format!(" ({})", technologies.join(", "))
    };
    Output::header(&format!("{} questions{}", skill_level, filter));

    for (i, question) in response.questions.iter().enumerate() {
        Output::question(i + 1, question);
    }
    println!();
    Output::info("Use 'prepdesk answer <id>' to see an answer.");

    Ok(())
}

/// Run the answer command.
pub async fn run_answer(id: &str, settings: Settings) -> Result<()> {
    let app = App::new(settings)?;
    let answer = app.tools().answer(id).await?;
    track(&app, id, Interaction::Viewed).await;

    Output::header(&answer.question);
    Output::kv("Difficulty", answer.difficulty.as_str());
    Output::kv("Technologies", &answer.technologies.join(", "));
    println!();
    if answer.answer.is_empty() {
        Output::info("No answer has been written for this question yet.");
    } else {
        println!("{}", answer.answer);
    }

    if let Some(related) = &answer.related_questions {
        Output::header("Related questions");
        for q in related {
            Output::kv(&q.id, &q.question);
        }
    }

    Ok(())
}

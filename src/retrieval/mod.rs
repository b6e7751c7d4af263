//! Question retrieval: ranked store results padded from the built-in pool.

pub mod fallback;

use crate::store::{Difficulty, Question, QuestionStore, QuestionSummary};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Selects questions for a skill level and technology filter.
#[derive(Clone)]
pub struct RetrievalSelector {
    store: Arc<dyn QuestionStore>,
}

impl RetrievalSelector {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// Return up to `count` questions.
    ///
    /// Store results come first; when they fall short the deficit is drawn
    /// from the built-in pool and appended without de-duplication. Usage
    /// counters are bumped in the background for store questions only.
    #[instrument(skip(self))]
    pub async fn select(
        &self,
        skill_level: Difficulty,
        technologies: &[String],
        count: usize,
    ) -> Vec<QuestionSummary> {
        let stored = self.store.get_questions(skill_level, technologies, count).await;
        let served_ids: Vec<String> = stored.iter().map(|q| q.id.clone()).collect();

        let mut questions: Vec<QuestionSummary> = stored.iter().map(Question::summary).collect();

        if questions.len() < count {
            let deficit = count - questions.len();
            let extra = fallback::pick(skill_level, technologies, deficit, &mut rand::thread_rng());
            debug!(
                "Store returned {} of {} questions, padding with {} built-in",
                questions.len(),
                count,
                extra.len()
            );
            questions.extend(extra.into_iter().map(|q| q.summary()));
        }

        if !served_ids.is_empty() {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                store.update_question_stats(&served_ids).await;
            });
        }

        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewQuestion, SqliteQuestionStore};

    fn new_question(text: &str, difficulty: Difficulty, techs: &[&str]) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: "answer".to_string(),
            difficulty,
            technologies: techs.iter().map(|t| t.to_string()).collect(),
            category: "frontend".to_string(),
            rating: None,
        }
    }

    fn selector() -> (Arc<SqliteQuestionStore>, RetrievalSelector) {
        let store = Arc::new(SqliteQuestionStore::in_memory().unwrap());
        let selector = RetrievalSelector::new(store.clone());
        (store, selector)
    }

    #[tokio::test]
    async fn test_empty_store_uses_matching_pool_only() {
        let (_, selector) = selector();
        let questions = selector
            .select(Difficulty::Junior, &["React".to_string()], 5)
            .await;

        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.id.starts_with("react-junior")));
        assert!(questions.iter().all(|q| q.has_detailed_answer));
    }

    #[tokio::test]
    async fn test_unmatched_technology_pads_from_whole_level() {
        let (_, selector) = selector();
        let questions = selector
            .select(Difficulty::Junior, &["Svelte".to_string()], 4)
            .await;

        assert_eq!(questions.len(), 4);
        assert!(questions.iter().all(|q| q.difficulty == Difficulty::Junior));

        let capped = selector
            .select(Difficulty::MidLevel, &["Svelte".to_string()], 10)
            .await;
        assert_eq!(capped.len(), fallback::pool_size(Difficulty::MidLevel));
    }

    #[tokio::test]
    async fn test_store_results_first_then_pool() {
        let (store, selector) = selector();
        let report = store
            .import_questions(&[new_question("What is a React portal?", Difficulty::Junior, &["React"])])
            .await;
        assert!(report.success);

        let questions = selector
            .select(Difficulty::Junior, &["React".to_string()], 3)
            .await;

        assert_eq!(questions.len(), 3);
        assert!(questions[0].id.starts_with("imported-"));
        assert!(questions[1..].iter().all(|q| q.id.starts_with("react-junior")));
    }

    #[tokio::test]
    async fn test_full_store_needs_no_pool() {
        let (store, selector) = selector();
        store
            .import_questions(&[
                new_question("Q1", Difficulty::Senior, &["Vue"]),
                new_question("Q2", Difficulty::Senior, &["Vue"]),
                new_question("Q3", Difficulty::Senior, &["Vue"]),
            ])
            .await;

        let questions = selector.select(Difficulty::Senior, &["Vue".to_string()], 2).await;
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.id.starts_with("imported-")));
    }

    #[tokio::test]
    async fn test_usage_counted_for_store_questions_only() {
        let (store, selector) = selector();
        store
            .import_questions(&[new_question("Explain flexbox.", Difficulty::Junior, &["CSS"])])
            .await;

        let questions = selector.select(Difficulty::Junior, &["CSS".to_string()], 2).await;
        assert_eq!(questions.len(), 2);
        let stored_id = questions[0].id.clone();

        // Let the background update run
        let mut times_used = 0;
        for _ in 0..20 {
            tokio::task::yield_now().await;
            times_used = store.get_question_by_id(&stored_id).await.unwrap().times_used;
            if times_used > 0 {
                break;
            }
        }
        assert_eq!(times_used, 1);
        assert!(store.get_question_by_id("css-junior-1").await.is_none());
    }
}

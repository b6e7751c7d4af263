//! SQLite-based question store implementation.
//!
//! List-valued columns (technologies, metadata) are stored as JSON text and
//! timestamps as RFC 3339 strings.

use super::{
    merge_recent_technologies, weighted_rating, Difficulty, Feedback, ImportReport, Interaction,
    InteractionRecord, NewQuestion, Question, QuestionStore, SavedQuestion, TrainingRecord,
    UserPreference,
};
use crate::error::{PrepdeskError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS questions (
        id TEXT PRIMARY KEY,
        question TEXT NOT NULL,
        answer TEXT NOT NULL DEFAULT '',
        difficulty TEXT NOT NULL CHECK(difficulty IN ('junior', 'mid-level', 'senior')),
        technologies TEXT NOT NULL DEFAULT '[]',
        rating REAL NOT NULL DEFAULT 0,
        rating_count INTEGER NOT NULL DEFAULT 0,
        times_used INTEGER NOT NULL DEFAULT 0,
        usage_count INTEGER NOT NULL DEFAULT 0,
        category TEXT NOT NULL DEFAULT 'frontend',
        source TEXT NOT NULL DEFAULT '',
        date_added TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        last_rated TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_questions_difficulty ON questions(difficulty);
    CREATE INDEX IF NOT EXISTS idx_questions_question ON questions(question);

    CREATE TABLE IF NOT EXISTS training_data (
        question_id TEXT PRIMARY KEY,
        question TEXT NOT NULL,
        answer TEXT NOT NULL DEFAULT '',
        difficulty TEXT NOT NULL CHECK(difficulty IN ('junior', 'mid-level', 'senior')),
        technologies TEXT NOT NULL DEFAULT '[]',
        date_added TEXT NOT NULL,
        metadata TEXT
    );

    CREATE TABLE IF NOT EXISTS user_preferences (
        user_id TEXT PRIMARY KEY,
        preferred_difficulty TEXT,
        recent_technologies TEXT NOT NULL DEFAULT '[]',
        last_active TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS interaction_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        question_id TEXT NOT NULL,
        interaction TEXT NOT NULL CHECK(interaction IN ('viewed', 'answered', 'skipped', 'liked', 'disliked')),
        timestamp TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_interaction_history_user ON interaction_history(user_id);

    CREATE TABLE IF NOT EXISTS feedback (
        id TEXT PRIMARY KEY,
        question_id TEXT NOT NULL,
        rating INTEGER NOT NULL CHECK(rating BETWEEN 1 AND 5),
        comment TEXT,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_feedback_question_id ON feedback(question_id);
"#;

const QUESTION_COLUMNS: &str = "id, question, answer, difficulty, technologies, rating, \
     rating_count, times_used, usage_count, category, source, date_added, created_at, \
     updated_at, last_rated";

/// SQLite-based question store.
pub struct SqliteQuestionStore {
    conn: Mutex<Connection>,
}

impl SqliteQuestionStore {
    /// Open (or create) a question store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite question store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| PrepdeskError::Store(format!("Failed to acquire lock: {}", e)))
    }

    fn query_questions(
        &self,
        difficulty: Difficulty,
        technologies: &[String],
        limit: usize,
    ) -> Result<Vec<Question>> {
        let conn = self.lock()?;

        let mut args: Vec<Value> = vec![Value::Text(difficulty.as_str().to_string())];
        let mut sql = format!("SELECT {} FROM questions WHERE difficulty = ?", QUESTION_COLUMNS);

        let patterns: Vec<String> = technologies
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", escape_like(t)))
            .collect();

        if !patterns.is_empty() {
            let clauses = vec!["technologies LIKE ? ESCAPE '\\'"; patterns.len()].join(" OR ");
            sql.push_str(&format!(" AND ({})", clauses));
            args.extend(patterns.into_iter().map(Value::Text));
        }

        sql.push_str(" ORDER BY rating DESC, times_used DESC LIMIT ?");
        args.push(Value::Integer(limit.min(i64::MAX as usize) as i64));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), row_to_question)?;
        let questions: Vec<Question> = rows.filter_map(|q| q.ok()).collect();

        debug!("Found {} {} questions", questions.len(), difficulty);
        Ok(questions)
    }

    fn query_question(&self, id: &str) -> Result<Option<Question>> {
        let conn = self.lock()?;
        let question = conn
            .query_row(
                &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
                params![id],
                row_to_question,
            )
            .optional()?;
        Ok(question)
    }

    fn increment_times_used(&self, ids: &[String]) -> Result<usize> {
        let conn = self.lock()?;
        let placeholders = vec!["?"; ids.len()].join(",");
        let updated = conn.execute(
            &format!(
                "UPDATE questions SET times_used = times_used + 1 WHERE id IN ({})",
                placeholders
            ),
            params_from_iter(ids.iter()),
        )?;
        Ok(updated)
    }

    fn query_training_data(&self, limit: usize) -> Result<Vec<TrainingRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT question_id, question, answer, difficulty, technologies, date_added, metadata
            FROM training_data
            ORDER BY date_added DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let technologies: String = row.get(4)?;
            let date_added: String = row.get(5)?;
            let metadata: Option<String> = row.get(6)?;
            Ok(TrainingRecord {
                question_id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
                difficulty: row.get(3)?,
                technologies: parse_list(&technologies),
                date_added: parse_timestamp(&date_added),
                metadata: metadata.and_then(|m| serde_json::from_str(&m).ok()),
            })
        })?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

#[async_trait]
impl QuestionStore for SqliteQuestionStore {
    #[instrument(skip(self))]
    async fn get_questions(
        &self,
        difficulty: Difficulty,
        technologies: &[String],
        limit: usize,
    ) -> Vec<Question> {
        self.query_questions(difficulty, technologies, limit)
            .unwrap_or_else(|e| {
                warn!("Error fetching questions: {}", e);
                Vec::new()
            })
    }

    #[instrument(skip(self))]
    async fn get_question_by_id(&self, id: &str) -> Option<Question> {
        self.query_question(id).unwrap_or_else(|e| {
            warn!("Error fetching question {}: {}", id, e);
            None
        })
    }

    #[instrument(skip(self, feedback), fields(question_id = %feedback.question_id))]
    async fn submit_feedback(&self, feedback: &Feedback) -> Result<()> {
        if !(1..=5).contains(&feedback.rating) {
            return Err(PrepdeskError::InvalidInput(format!(
                "Rating must be between 1 and 5, got {}",
                feedback.rating
            )));
        }

        let mut conn = self.lock()?;
        // Dropping the transaction without commit rolls it back
        let tx = conn.transaction()?;

        let current: Option<(f64, u32)> = tx
            .query_row(
                "SELECT rating, rating_count FROM questions WHERE id = ?1",
                params![feedback.question_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (rating, rating_count) = current
            .ok_or_else(|| PrepdeskError::NotFound(feedback.question_id.clone()))?;

        tx.execute(
            r#"
            INSERT INTO feedback (id, question_id, rating, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                feedback.id,
                feedback.question_id,
                feedback.rating,
                feedback.comment,
                feedback.created_at.to_rfc3339(),
            ],
        )?;

        let new_rating = weighted_rating(rating, rating_count, feedback.rating);
        let rated_at = feedback.created_at.to_rfc3339();

        tx.execute(
            r#"
            UPDATE questions
            SET rating = ?1, rating_count = rating_count + 1, last_rated = ?2, updated_at = ?2
            WHERE id = ?3
            "#,
            params![new_rating, rated_at, feedback.question_id],
        )?;

        tx.commit()?;

        info!(
            "Recorded feedback {} for question {} (rating {:.2} over {} ratings)",
            feedback.id,
            feedback.question_id,
            new_rating,
            rating_count + 1
        );
        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn update_question_stats(&self, ids: &[String]) -> usize {
        if ids.is_empty() {
            return 0;
        }

        match self.increment_times_used(ids) {
            Ok(updated) => {
                debug!("Updated usage stats for {} questions", updated);
                updated
            }
            Err(e) => {
                warn!("Error updating question stats: {}", e);
                0
            }
        }
    }

    #[instrument(skip(self, questions), fields(count = questions.len()))]
    async fn import_questions(&self, questions: &[NewQuestion]) -> ImportReport {
        let mut conn = match self.lock() {
            Ok(conn) => conn,
            Err(e) => {
                return ImportReport {
                    success: false,
                    count: 0,
                    failed_index: None,
                    error: Some(e.to_string()),
                }
            }
        };

        let result = (|| -> std::result::Result<usize, (Option<usize>, PrepdeskError)> {
            let tx = conn.transaction().map_err(|e| (None, e.into()))?;
            let now = Utc::now().to_rfc3339();

            for (index, q) in questions.iter().enumerate() {
                insert_question(&tx, &format!("imported-{}", Uuid::new_v4()), q, "import", &now)
                    .map_err(|e| (Some(index), e))?;
            }

            tx.commit().map_err(|e| (None, e.into()))?;
            Ok(questions.len())
        })();

        match result {
            Ok(count) => {
                info!("Imported {} questions", count);
                ImportReport {
                    success: true,
                    count,
                    failed_index: None,
                    error: None,
                }
            }
            Err((failed_index, e)) => {
                warn!("Error importing questions: {}", e);
                ImportReport {
                    success: false,
                    count: 0,
                    failed_index,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    #[instrument(skip(self, question))]
    async fn save_custom_question(&self, question: &NewQuestion) -> Result<SavedQuestion> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM questions WHERE question = ?1",
                params![question.question],
                |row| row.get(0),
            )
            .optional()?;

        let saved = match existing {
            Some(id) => {
                tx.execute(
                    r#"
                    UPDATE questions
                    SET answer = ?1, difficulty = ?2, technologies = ?3, category = ?4, updated_at = ?5
                    WHERE id = ?6
                    "#,
                    params![
                        question.answer,
                        question.difficulty,
                        serde_json::to_string(&question.technologies)?,
                        question.category,
                        now,
                        id,
                    ],
                )?;
                info!("Updated custom question {}", id);
                SavedQuestion { id, created: false }
            }
            None => {
                let id = format!("custom-{}", Uuid::new_v4());
                insert_question(&tx, &id, question, "custom", &now)?;
                tx.execute(
                    r#"
                    INSERT INTO training_data
                    (question_id, question, answer, difficulty, technologies, date_added, metadata)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    params![
                        id,
                        question.question,
                        question.answer,
                        question.difficulty,
                        serde_json::to_string(&question.technologies)?,
                        now,
                        serde_json::json!({ "source": "custom", "category": question.category })
                            .to_string(),
                    ],
                )?;
                info!("Added custom question {}", id);
                SavedQuestion { id, created: true }
            }
        };

        tx.commit()?;
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn get_user_preferences(&self, user_id: &str) -> Option<UserPreference> {
        let result = self
            .lock()
            .and_then(|conn| read_preferences(&conn, user_id).map_err(PrepdeskError::from));

        result.unwrap_or_else(|e| {
            warn!("Error fetching user preferences for {}: {}", user_id, e);
            None
        })
    }

    #[instrument(skip(self, preference), fields(user_id = %preference.user_id))]
    async fn save_user_preferences(&self, preference: &UserPreference) -> Result<()> {
        let conn = self.lock()?;
        write_preferences(&conn, preference)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_interaction(
        &self,
        user_id: &str,
        question_id: &str,
        interaction: Interaction,
    ) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        tx.execute(
            r#"
            INSERT INTO interaction_history (user_id, question_id, interaction, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, question_id, interaction, now.to_rfc3339()],
        )?;

        let question: Option<(Difficulty, String)> = tx
            .query_row(
                "SELECT difficulty, technologies FROM questions WHERE id = ?1",
                params![question_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (difficulty, technologies) = match question {
            Some((d, t)) => (Some(d), parse_list(&t)),
            None => (None, Vec::new()),
        };

        let preference = match read_preferences(&tx, user_id)? {
            Some(existing) => UserPreference {
                preferred_difficulty: existing.preferred_difficulty.or(difficulty),
                recent_technologies: merge_recent_technologies(
                    &existing.recent_technologies,
                    &technologies,
                ),
                last_active: now,
                ..existing
            },
            None => UserPreference {
                user_id: user_id.to_string(),
                preferred_difficulty: difficulty,
                recent_technologies: merge_recent_technologies(&[], &technologies),
                last_active: now,
            },
        };
        write_preferences(&tx, &preference)?;

        tx.commit()?;
        debug!("Recorded {} interaction for user {}", interaction.as_str(), user_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_interaction_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, question_id, interaction, timestamp
            FROM interaction_history
            WHERE user_id = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            let timestamp: String = row.get(3)?;
            Ok(InteractionRecord {
                user_id: row.get(0)?,
                question_id: row.get(1)?,
                interaction: row.get(2)?,
                timestamp: parse_timestamp(&timestamp),
            })
        })?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    #[instrument(skip(self))]
    async fn get_training_data(&self, limit: usize) -> Vec<TrainingRecord> {
        self.query_training_data(limit).unwrap_or_else(|e| {
            warn!("Error fetching training data: {}", e);
            Vec::new()
        })
    }

    async fn question_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn insert_question(
    conn: &Connection,
    id: &str,
    question: &NewQuestion,
    source: &str,
    now: &str,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO questions
        (id, question, answer, difficulty, technologies, rating, rating_count, times_used,
         usage_count, category, source, date_added, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, 0, ?7, ?8, ?9, ?9, ?9)
        "#,
        params![
            id,
            question.question,
            question.answer,
            question.difficulty,
            serde_json::to_string(&question.technologies)?,
            question.rating.unwrap_or(0.0),
            question.category,
            source,
            now,
        ],
    )?;
    Ok(())
}

fn read_preferences(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<UserPreference>> {
    conn.query_row(
        r#"
        SELECT user_id, preferred_difficulty, recent_technologies, last_active
        FROM user_preferences
        WHERE user_id = ?1
        "#,
        params![user_id],
        |row| {
            let preferred: Option<String> = row.get(1)?;
            let recent: String = row.get(2)?;
            let last_active: String = row.get(3)?;
            Ok(UserPreference {
                user_id: row.get(0)?,
                preferred_difficulty: preferred.and_then(|d| d.parse().ok()),
                recent_technologies: parse_list(&recent),
                last_active: parse_timestamp(&last_active),
            })
        },
    )
    .optional()
}

fn write_preferences(conn: &Connection, preference: &UserPreference) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO user_preferences (user_id, preferred_difficulty, recent_technologies, last_active)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(user_id) DO UPDATE SET
            preferred_difficulty = excluded.preferred_difficulty,
            recent_technologies = excluded.recent_technologies,
            last_active = excluded.last_active
        "#,
        params![
            preference.user_id,
            preference.preferred_difficulty,
            serde_json::to_string(&preference.recent_technologies)?,
            preference.last_active.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn row_to_question(row: &Row<'_>) -> rusqlite::Result<Question> {
    let technologies: String = row.get(4)?;
    let date_added: String = row.get(11)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    let last_rated: Option<String> = row.get(14)?;

    Ok(Question {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        difficulty: row.get(3)?,
        technologies: parse_list(&technologies),
        rating: row.get(5)?,
        rating_count: row.get(6)?,
        times_used: row.get(7)?,
        usage_count: row.get(8)?,
        category: row.get(9)?,
        source: row.get(10)?,
        date_added: parse_timestamp(&date_added),
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
        last_rated: last_rated.map(|s| parse_timestamp(&s)),
    })
}

/// Parse a JSON string list, falling back to an empty list.
fn parse_list(value: &str) -> Vec<String> {
    serde_json::from_str(value).unwrap_or_default()
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Escape LIKE wildcards so technologies match literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: PrepdeskError| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Interaction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Interaction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: PrepdeskError| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(
        store: &SqliteQuestionStore,
        id: &str,
        difficulty: Difficulty,
        technologies: &[&str],
        rating: f64,
        rating_count: u32,
        times_used: u32,
    ) {
        let now = Utc::now().to_rfc3339();
        let conn = store.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO questions
            (id, question, answer, difficulty, technologies, rating, rating_count, times_used,
             usage_count, category, source, date_added, created_at, updated_at)
            VALUES (?1, ?2, 'An answer', ?3, ?4, ?5, ?6, ?7, 0, 'frontend', 'test', ?8, ?8, ?8)
            "#,
            params![
                id,
                format!("Question {}", id),
                difficulty,
                serde_json::to_string(technologies).unwrap(),
                rating,
                rating_count,
                times_used,
                now,
            ],
        )
        .unwrap();
    }

    fn feedback(question_id: &str, rating: u8) -> Feedback {
        Feedback {
            id: format!("feedback-{}", Uuid::new_v4()),
            question_id: question_id.to_string(),
            rating,
            comment: Some("useful".to_string()),
            created_at: Utc::now(),
        }
    }

    fn feedback_rows(store: &SqliteQuestionStore) -> i64 {
        let conn = store.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_questions_filters_and_orders() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "a", Difficulty::Junior, &["React", "JavaScript"], 4.0, 2, 1);
        seed(&store, "b", Difficulty::Junior, &["React"], 4.5, 1, 0);
        seed(&store, "c", Difficulty::Junior, &["React"], 4.0, 1, 7);
        seed(&store, "d", Difficulty::Senior, &["React"], 5.0, 1, 0);
        seed(&store, "e", Difficulty::Junior, &["CSS"], 5.0, 1, 0);

        let questions = store
            .get_questions(Difficulty::Junior, &["react".to_string()], 10)
            .await;
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert!(questions.iter().all(|q| q.difficulty == Difficulty::Junior));

        let limited = store
            .get_questions(Difficulty::Junior, &["React".to_string()], 2)
            .await;
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_get_questions_matches_any_technology() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "react", Difficulty::MidLevel, &["React"], 3.0, 1, 0);
        seed(&store, "css", Difficulty::MidLevel, &["CSS"], 4.0, 1, 0);
        seed(&store, "vue", Difficulty::MidLevel, &["Vue"], 5.0, 1, 0);

        let questions = store
            .get_questions(
                Difficulty::MidLevel,
                &["Angular".to_string(), "CSS".to_string(), "React".to_string()],
                10,
            )
            .await;
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["css", "react"]);

        let all = store.get_questions(Difficulty::MidLevel, &[], 10).await;
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_like_wildcards_are_literal() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "a", Difficulty::Junior, &["React"], 3.0, 1, 0);

        let questions = store
            .get_questions(Difficulty::Junior, &["%".to_string()], 10)
            .await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_submit_feedback_updates_weighted_rating() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "q1", Difficulty::Junior, &["JavaScript"], 4.0, 9, 0);

        store.submit_feedback(&feedback("q1", 5)).await.unwrap();

        let question = store.get_question_by_id("q1").await.unwrap();
        assert!((question.rating - 4.1).abs() < 1e-9);
        assert_eq!(question.rating_count, 10);
        assert!(question.last_rated.is_some());
        assert_eq!(feedback_rows(&store), 1);
    }

    #[tokio::test]
    async fn test_submit_feedback_unknown_question() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "q1", Difficulty::Junior, &["JavaScript"], 4.0, 2, 0);

        let err = store.submit_feedback(&feedback("missing", 5)).await.unwrap_err();
        assert!(matches!(err, PrepdeskError::NotFound(id) if id == "missing"));
        assert_eq!(feedback_rows(&store), 0);

        let question = store.get_question_by_id("q1").await.unwrap();
        assert_eq!(question.rating, 4.0);
        assert_eq!(question.rating_count, 2);
    }

    #[tokio::test]
    async fn test_submit_feedback_rolls_back_on_failure() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "q1", Difficulty::Junior, &["JavaScript"], 3.0, 1, 0);

        let first = feedback("q1", 5);
        store.submit_feedback(&first).await.unwrap();

        // Reusing the feedback id violates the primary key
        let mut duplicate = feedback("q1", 1);
        duplicate.id = first.id.clone();
        assert!(store.submit_feedback(&duplicate).await.is_err());

        let question = store.get_question_by_id("q1").await.unwrap();
        assert_eq!(question.rating, 4.0);
        assert_eq!(question.rating_count, 2);
        assert_eq!(feedback_rows(&store), 1);
    }

    #[tokio::test]
    async fn test_submit_feedback_rejects_out_of_range() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "q1", Difficulty::Junior, &["JavaScript"], 3.0, 1, 0);

        let err = store.submit_feedback(&feedback("q1", 6)).await.unwrap_err();
        assert!(matches!(err, PrepdeskError::InvalidInput(_)));
        let err = store.submit_feedback(&feedback("q1", 0)).await.unwrap_err();
        assert!(matches!(err, PrepdeskError::InvalidInput(_)));
        assert_eq!(feedback_rows(&store), 0);
    }

    #[tokio::test]
    async fn test_get_question_by_id_is_stable() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "q1", Difficulty::Senior, &["Performance"], 4.7, 3, 2);

        let first = store.get_question_by_id("q1").await;
        let second = store.get_question_by_id("q1").await;
        assert!(first.is_some());
        assert_eq!(first, second);
        assert!(store.get_question_by_id("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_update_question_stats() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "a", Difficulty::Junior, &["CSS"], 0.0, 0, 0);
        seed(&store, "b", Difficulty::Junior, &["CSS"], 0.0, 0, 4);

        let updated = store
            .update_question_stats(&["a".to_string(), "b".to_string(), "ghost".to_string()])
            .await;
        assert_eq!(updated, 2);
        assert_eq!(store.update_question_stats(&[]).await, 0);

        assert_eq!(store.get_question_by_id("a").await.unwrap().times_used, 1);
        let b = store.get_question_by_id("b").await.unwrap();
        assert_eq!(b.times_used, 5);
        assert_eq!(b.usage_count, 0);
    }

    #[tokio::test]
    async fn test_import_questions() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        let questions = vec![
            NewQuestion {
                question: "What is the virtual DOM?".to_string(),
                answer: "An in-memory tree".to_string(),
                difficulty: Difficulty::Junior,
                technologies: vec!["React".to_string()],
                category: "frontend".to_string(),
                rating: Some(4.0),
            },
            NewQuestion {
                question: "Explain CSS specificity.".to_string(),
                answer: String::new(),
                difficulty: Difficulty::MidLevel,
                technologies: vec!["CSS".to_string()],
                category: "frontend".to_string(),
                rating: None,
            },
        ];

        let report = store.import_questions(&questions).await;
        assert!(report.success);
        assert_eq!(report.count, 2);
        assert_eq!(store.question_count().await.unwrap(), 2);

        let junior = store
            .get_questions(Difficulty::Junior, &["React".to_string()], 5)
            .await;
        assert_eq!(junior.len(), 1);
        assert!(junior[0].id.starts_with("imported-"));
        assert_eq!(junior[0].source, "import");
        assert_eq!(junior[0].rating_count, 0);
        assert_eq!(junior[0].times_used, 0);
    }

    #[tokio::test]
    async fn test_import_questions_is_all_or_nothing() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch(
                r#"
                CREATE TRIGGER reject_flexbox BEFORE INSERT ON questions
                WHEN NEW.question LIKE '%flexbox%'
                BEGIN
                    SELECT RAISE(ABORT, 'rejected');
                END;
                "#,
            )
            .unwrap();

        let questions: Vec<NewQuestion> = ["What is hoisting?", "Explain flexbox.", "What is a Promise?"]
            .iter()
            .map(|text| NewQuestion {
                question: text.to_string(),
                answer: String::new(),
                difficulty: Difficulty::Junior,
                technologies: vec!["JavaScript".to_string()],
                category: "frontend".to_string(),
                rating: None,
            })
            .collect();

        let report = store.import_questions(&questions).await;
        assert!(!report.success);
        assert_eq!(report.count, 0);
        assert_eq!(report.failed_index, Some(1));
        assert!(report.error.unwrap().contains("rejected"));
        assert_eq!(store.question_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_custom_question_inserts_then_updates() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        let mut question = NewQuestion {
            question: "What does useMemo do?".to_string(),
            answer: "Memoizes a value".to_string(),
            difficulty: Difficulty::MidLevel,
            technologies: vec!["React".to_string()],
            category: "frontend".to_string(),
            rating: None,
        };

        let created = store.save_custom_question(&question).await.unwrap();
        assert!(created.created);
        assert_eq!(store.get_training_data(10).await.len(), 1);

        question.answer = "Caches a computed value between renders".to_string();
        let updated = store.save_custom_question(&question).await.unwrap();
        assert!(!updated.created);
        assert_eq!(updated.id, created.id);

        let stored = store.get_question_by_id(&created.id).await.unwrap();
        assert_eq!(stored.answer, "Caches a computed value between renders");
        assert_eq!(stored.source, "custom");
        assert_eq!(store.question_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_interaction_updates_preferences() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        seed(&store, "q1", Difficulty::Senior, &["React", "Performance"], 4.0, 5, 0);

        store
            .record_interaction("user-1", "q1", Interaction::Liked)
            .await
            .unwrap();
        store
            .record_interaction("user-1", "q1", Interaction::Answered)
            .await
            .unwrap();

        let history = store.get_interaction_history("user-1", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].interaction, Interaction::Answered);

        let preference = store.get_user_preferences("user-1").await.unwrap();
        assert_eq!(preference.preferred_difficulty, Some(Difficulty::Senior));
        assert_eq!(preference.recent_technologies, vec!["React", "Performance"]);

        // Likes are logged only; the rating stays the weighted feedback mean
        let question = store.get_question_by_id("q1").await.unwrap();
        assert_eq!(question.rating, 4.0);
        assert_eq!(question.rating_count, 5);
    }

    #[tokio::test]
    async fn test_user_preferences_roundtrip() {
        let store = SqliteQuestionStore::in_memory().unwrap();
        assert!(store.get_user_preferences("nobody").await.is_none());

        let preference = UserPreference {
            user_id: "user-2".to_string(),
            preferred_difficulty: Some(Difficulty::Junior),
            recent_technologies: vec!["CSS".to_string()],
            last_active: Utc::now(),
        };
        store.save_user_preferences(&preference).await.unwrap();

        let loaded = store.get_user_preferences("user-2").await.unwrap();
        assert_eq!(loaded.preferred_difficulty, Some(Difficulty::Junior));
        assert_eq!(loaded.recent_technologies, vec!["CSS"]);
    }

    #[test]
    fn test_parse_list_falls_back_to_empty() {
        assert_eq!(parse_list(r#"["React","CSS"]"#), vec!["React", "CSS"]);
        assert!(parse_list("not json").is_empty());
    }

    #[test]
    fn test_store_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("questions.db");
        let store = SqliteQuestionStore::new(&path).unwrap();
        assert!(path.exists());
        drop(store);

        // Reopening an existing database keeps the schema
        assert!(SqliteQuestionStore::new(&path).is_ok());
    }
}

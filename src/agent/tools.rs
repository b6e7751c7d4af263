//! Tool definitions and implementations shared by the agent, the MCP server
//! and the HTTP API.
//!
//! Arguments arrive as JSON objects with camelCase fields. They are validated
//! into a [`ToolCall`] before anything touches the store.

use crate::error::{PrepdeskError, Result};
use crate::feedback::{FeedbackOutcome, FeedbackProcessor};
use crate::import::{self, ImportOutcome};
use crate::price::{BitcoinPrice, PriceClient};
use crate::retrieval::{fallback, RetrievalSelector};
use crate::review::{self, ReviewReport};
use crate::store::{default_category, Difficulty, NewQuestion, QuestionStore, QuestionSummary};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Questions returned when a call does not specify a count.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Largest count a single request may ask for.
pub const MAX_QUESTION_COUNT: usize = 50;

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    GetInterviewQuestions {
        skill_level: Difficulty,
        technologies: Vec<String>,
        count: usize,
    },
    GetAnswer {
        question_id: String,
    },
    SubmitFeedback {
        question_id: String,
        rating: u8,
        comment: Option<String>,
    },
    UploadCustomQuestion(NewQuestion),
    ImportQuestions {
        filename: String,
        content: String,
        content_type: Option<String>,
    },
    GetBitcoinPrice {
        currency: String,
    },
    ReviewCode {
        code: String,
        language: String,
    },
}

/// Name, description and JSON schema of a tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// All tools, in the order they are advertised.
pub fn tool_specs() -> Vec<ToolSpec> {
    let difficulty = json!({
        "type": "string",
        "enum": ["junior", "mid-level", "senior"],
        "description": "Skill level: junior, mid-level or senior"
    });
    let technologies = json!({
        "type": "array",
        "items": { "type": "string" },
        "description": "Technologies such as React, Vue, JavaScript or CSS"
    });

    vec![
        ToolSpec {
            name: "get_interview_questions",
            description: "Get frontend interview questions for a skill level and set of technologies. \
                Returns question summaries with IDs that can be passed to get_answer.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "skillLevel": difficulty,
                    "technologies": technologies,
                    "count": {
                        "type": "integer",
                        "description": "Number of questions (1-50)",
                        "default": DEFAULT_QUESTION_COUNT,
                        "minimum": 1,
                        "maximum": MAX_QUESTION_COUNT
                    }
                },
                "required": ["skillLevel", "technologies"]
            }),
        },
        ToolSpec {
            name: "get_answer",
            description: "Get the answer for a specific interview question, with related questions.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "questionId": { "type": "string", "description": "The question ID" }
                },
                "required": ["questionId"]
            }),
        },
        ToolSpec {
            name: "submit_feedback",
            description: "Rate an interview question from 1 to 5 to improve future recommendations.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "questionId": { "type": "string", "description": "The question ID" },
                    "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                    "comment": { "type": "string", "description": "Optional comment" }
                },
                "required": ["questionId", "rating"]
            }),
        },
        ToolSpec {
            name: "upload_custom_question",
            description: "Upload a custom frontend interview question to the question bank.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "question": { "type": "string", "description": "The interview question text" },
                    "answer": { "type": "string", "description": "The answer (optional)" },
                    "difficulty": difficulty,
                    "technologies": technologies,
                    "category": { "type": "string", "default": "frontend" }
                },
                "required": ["question", "difficulty", "technologies"]
            }),
        },
        ToolSpec {
            name: "import_questions",
            description: "Import interview questions in bulk from a JSON or CSV file.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "file": {
                        "type": "object",
                        "properties": {
                            "filename": { "type": "string" },
                            "content": { "type": "string", "description": "File content as text" },
                            "contentType": { "type": "string" }
                        },
                        "required": ["filename", "content"]
                    }
                },
                "required": ["file"]
            }),
        },
        ToolSpec {
            name: "get_bitcoin_price",
            description: "Get the current Bitcoin price in a given currency.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "currency": {
                        "type": "string",
                        "description": "Currency code such as usd or eur",
                        "default": "usd"
                    }
                }
            }),
        },
        ToolSpec {
            name: "review_code",
            description: "Review a JavaScript or TypeScript snippet and report issues by line.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "language": { "type": "string", "description": "javascript or typescript" }
                },
                "required": ["code", "language"]
            }),
        },
    ]
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    tool_specs()
        .into_iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.to_string(),
                description: Some(tool.description.to_string()),
                parameters: Some(tool.input_schema),
                strict: None,
            },
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionsArgs {
    skill_level: String,
    #[serde(default)]
    technologies: Vec<String>,
    count: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerArgs {
    question_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackArgs {
    question_id: String,
    rating: i64,
    comment: Option<String>,
}

#[derive(Deserialize)]
struct UploadArgs {
    question: String,
    answer: Option<String>,
    difficulty: String,
    technologies: Vec<String>,
    category: Option<String>,
}

#[derive(Deserialize)]
struct ImportArgs {
    file: ImportFileArgs,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportFileArgs {
    filename: String,
    content: String,
    content_type: Option<String>,
}

#[derive(Deserialize)]
struct PriceArgs {
    currency: Option<String>,
}

#[derive(Deserialize)]
struct ReviewArgs {
    code: String,
    language: String,
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: Value = if arguments.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(arguments)
            .map_err(|e| PrepdeskError::Agent(format!("Invalid tool arguments: {}", e)))?
    };
    parse_tool_args(name, args)
}

/// Validate already-decoded arguments for the named tool.
pub fn parse_tool_args(name: &str, args: Value) -> Result<ToolCall> {
    let args = if args.is_null() { json!({}) } else { args };

    match name {
        "get_interview_questions" => {
            let a: QuestionsArgs = decode(name, args)?;
            let count = match a.count {
                None => DEFAULT_QUESTION_COUNT,
                Some(n) if (1..=MAX_QUESTION_COUNT as i64).contains(&n) => n as usize,
                Some(n) => {
                    return Err(PrepdeskError::InvalidInput(format!(
                        "count must be between 1 and {}, got {}",
                        MAX_QUESTION_COUNT, n
                    )))
                }
            };
            Ok(ToolCall::GetInterviewQuestions {
                skill_level: a.skill_level.parse()?,
                technologies: a.technologies,
                count,
            })
        }
        "get_answer" => {
            let a: AnswerArgs = decode(name, args)?;
            Ok(ToolCall::GetAnswer {
                question_id: non_empty("questionId", a.question_id)?,
            })
        }
        "submit_feedback" => {
            let a: FeedbackArgs = decode(name, args)?;
            if !(1..=5).contains(&a.rating) {
                return Err(PrepdeskError::InvalidInput(format!(
                    "rating must be between 1 and 5, got {}",
                    a.rating
                )));
            }
            Ok(ToolCall::SubmitFeedback {
                question_id: non_empty("questionId", a.question_id)?,
                rating: a.rating as u8,
                comment: a.comment,
            })
        }
        "upload_custom_question" => {
            let a: UploadArgs = decode(name, args)?;
            Ok(ToolCall::UploadCustomQuestion(NewQuestion {
                question: non_empty("question", a.question)?,
                answer: a.answer.unwrap_or_default(),
                difficulty: a.difficulty.parse()?,
                technologies: a.technologies,
                category: a
                    .category
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(default_category),
                rating: None,
            }))
        }
        "import_questions" => {
            let a: ImportArgs = decode(name, args)?;
            Ok(ToolCall::ImportQuestions {
                filename: non_empty("filename", a.file.filename)?,
                content: a.file.content,
                content_type: a.file.content_type,
            })
        }
        "get_bitcoin_price" => {
            let a: PriceArgs = decode(name, args)?;
            let currency = a
                .currency
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "usd".to_string());
            Ok(ToolCall::GetBitcoinPrice { currency })
        }
        "review_code" => {
            let a: ReviewArgs = decode(name, args)?;
            Ok(ToolCall::ReviewCode {
                code: a.code,
                language: a.language,
            })
        }
        _ => Err(PrepdeskError::Agent(format!("Unknown tool: {}", name))),
    }
}

fn decode<T: serde::de::DeserializeOwned>(name: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| PrepdeskError::InvalidInput(format!("Invalid arguments for {}: {}", name, e)))
}

fn non_empty(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(PrepdeskError::InvalidInput(format!("{} must not be empty", field)))
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: Difficulty,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_questions: Option<Vec<RelatedQuestion>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub success: bool,
    pub question_id: String,
    pub message: String,
}

/// Tool execution context with access to the question store and price feed.
pub struct ToolContext {
    store: Arc<dyn QuestionStore>,
    selector: RetrievalSelector,
    feedback: FeedbackProcessor,
    price: PriceClient,
    related_limit: usize,
}

impl ToolContext {
    pub fn new(store: Arc<dyn QuestionStore>, price: PriceClient, related_limit: usize) -> Self {
        Self {
            selector: RetrievalSelector::new(Arc::clone(&store)),
            feedback: FeedbackProcessor::new(Arc::clone(&store)),
            store,
            price,
            related_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn QuestionStore> {
        &self.store
    }

    /// Execute a tool call and return the result as a JSON string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        let value = match tool {
            ToolCall::GetInterviewQuestions {
                skill_level,
                technologies,
                count,
            } => to_json(
                &self
                    .interview_questions(*skill_level, technologies, *count)
                    .await,
            )?,
            ToolCall::GetAnswer { question_id } => to_json(&self.answer(question_id).await?)?,
            ToolCall::SubmitFeedback {
                question_id,
                rating,
                comment,
            } => to_json(
                &self
                    .submit_feedback(question_id, *rating, comment.clone())
                    .await,
            )?,
            ToolCall::UploadCustomQuestion(question) => {
                to_json(&self.upload_custom_question(question).await)?
            }
            ToolCall::ImportQuestions {
                filename,
                content,
                content_type,
            } => {
                debug!("Importing {} ({:?})", filename, content_type);
                to_json(&self.import_questions(filename, content).await)?
            }
            ToolCall::GetBitcoinPrice { currency } => {
                to_json(&self.bitcoin_price(currency).await?)?
            }
            ToolCall::ReviewCode { code, language } => to_json(&self.review(code, language))?,
        };
        Ok(value)
    }

    pub async fn interview_questions(
        &self,
        skill_level: Difficulty,
        technologies: &[String],
        count: usize,
    ) -> QuestionsResponse {
        QuestionsResponse {
            questions: self.selector.select(skill_level, technologies, count).await,
        }
    }

    /// Look up a question's answer and up to `related_limit` related questions.
    ///
    /// Questions from the built-in pool are answered too, so IDs handed out
    /// by [`RetrievalSelector::select`] always resolve.
    pub async fn answer(&self, question_id: &str) -> Result<AnswerResponse> {
        let (question, answer, difficulty, technologies) =
            match self.store.get_question_by_id(question_id).await {
                Some(q) => (q.question, q.answer, q.difficulty, q.technologies),
                None => {
                    let pooled = fallback::find(question_id)
                        .ok_or_else(|| PrepdeskError::NotFound(question_id.to_string()))?;
                    (
                        pooled.question.to_string(),
                        pooled.answer.to_string(),
                        pooled.difficulty,
                        pooled.technologies.iter().map(|t| t.to_string()).collect(),
                    )
                }
            };

        let related: Vec<RelatedQuestion> = self
            .store
            .get_questions(difficulty, &technologies, self.related_limit)
            .await
            .into_iter()
            .filter(|q| q.id != question_id)
            .map(|q| RelatedQuestion {
                id: q.id,
                question: q.question,
                difficulty: q.difficulty,
                technologies: q.technologies,
            })
            .collect();

        Ok(AnswerResponse {
            question,
            answer,
            difficulty,
            technologies,
            related_questions: (!related.is_empty()).then_some(related),
        })
    }

    pub async fn submit_feedback(
        &self,
        question_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> FeedbackOutcome {
        self.feedback.submit(question_id, rating, comment).await
    }

    pub async fn upload_custom_question(&self, question: &NewQuestion) -> UploadOutcome {
        match self.store.save_custom_question(question).await {
            Ok(saved) => UploadOutcome {
                success: true,
                question_id: saved.id,
                message: if saved.created {
                    "Question added successfully".to_string()
                } else {
                    "Question updated successfully".to_string()
                },
            },
            Err(e) => {
                warn!("Error saving custom question: {}", e);
                UploadOutcome {
                    success: false,
                    question_id: String::new(),
                    message: "Failed to save question".to_string(),
                }
            }
        }
    }

    pub async fn import_questions(&self, filename: &str, content: &str) -> ImportOutcome {
        import::import_file(self.store.as_ref(), filename, content).await
    }

    pub async fn bitcoin_price(&self, currency: &str) -> Result<BitcoinPrice> {
        self.price.bitcoin_price(currency).await
    }

    pub fn review(&self, code: &str, language: &str) -> ReviewReport {
        review::review_code(code, language)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceFeedSettings;
    use crate::store::SqliteQuestionStore;

    fn context() -> (Arc<SqliteQuestionStore>, ToolContext) {
        let store = Arc::new(SqliteQuestionStore::in_memory().unwrap());
        let price = PriceClient::new(&PriceFeedSettings::default()).unwrap();
        let ctx = ToolContext::new(store.clone(), price, 3);
        (store, ctx)
    }

    fn react_question(text: &str) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: format!("Answer to {}", text),
            difficulty: Difficulty::MidLevel,
            technologies: vec!["React".to_string()],
            category: "frontend".to_string(),
            rating: None,
        }
    }

    #[test]
    fn test_parse_interview_questions() {
        let tool = parse_tool_call(
            "get_interview_questions",
            r#"{"skillLevel": "Mid-Level", "technologies": ["React"]}"#,
        )
        .unwrap();
        assert_eq!(
            tool,
            ToolCall::GetInterviewQuestions {
                skill_level: Difficulty::MidLevel,
                technologies: vec!["React".to_string()],
                count: DEFAULT_QUESTION_COUNT,
            }
        );
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert!(matches!(
            parse_tool_call("get_interview_questions", r#"{"skillLevel": "guru"}"#),
            Err(PrepdeskError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_tool_call(
                "get_interview_questions",
                r#"{"skillLevel": "junior", "count": 0}"#
            ),
            Err(PrepdeskError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_tool_call("submit_feedback", r#"{"questionId": "q", "rating": 6}"#),
            Err(PrepdeskError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_tool_call("get_answer", r#"{}"#),
            Err(PrepdeskError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_tool_call("get_answer", "not json"),
            Err(PrepdeskError::Agent(_))
        ));
        assert!(matches!(
            parse_tool_call("launch_rocket", "{}"),
            Err(PrepdeskError::Agent(_))
        ));
    }

    #[test]
    fn test_parse_defaults() {
        let tool = parse_tool_call("get_bitcoin_price", "").unwrap();
        assert_eq!(tool, ToolCall::GetBitcoinPrice { currency: "usd".to_string() });

        let tool = parse_tool_call(
            "upload_custom_question",
            r#"{"question": "What is JSX?", "difficulty": "junior", "technologies": ["React"]}"#,
        )
        .unwrap();
        match tool {
            ToolCall::UploadCustomQuestion(q) => {
                assert_eq!(q.category, "frontend");
                assert!(q.answer.is_empty());
            }
            other => panic!("Expected UploadCustomQuestion, got {:?}", other),
        }
    }

    #[test]
    fn test_tool_definitions_match_specs() {
        let names: Vec<String> = tool_definitions().into_iter().map(|t| t.function.name).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"review_code".to_string()));
    }

    #[tokio::test]
    async fn test_answer_with_related_questions() {
        let (store, ctx) = context();
        let first = store.save_custom_question(&react_question("What are hooks?")).await.unwrap();
        store.save_custom_question(&react_question("What is reconciliation?")).await.unwrap();

        let answer = ctx.answer(&first.id).await.unwrap();
        assert_eq!(answer.question, "What are hooks?");
        let related = answer.related_questions.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].question, "What is reconciliation?");
    }

    #[tokio::test]
    async fn test_answer_omits_empty_related() {
        let (store, ctx) = context();
        let only = store.save_custom_question(&react_question("What are hooks?")).await.unwrap();

        let json = ctx
            .execute(&ToolCall::GetAnswer { question_id: only.id })
            .await
            .unwrap();
        assert!(!json.contains("relatedQuestions"));
    }

    #[tokio::test]
    async fn test_answer_pool_and_missing() {
        let (_, ctx) = context();
        let pooled = ctx.answer("react-junior-1").await.unwrap();
        assert_eq!(pooled.difficulty, Difficulty::Junior);
        assert!(!pooled.answer.is_empty());

        let err = ctx.answer("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Question with ID nope not found");
    }

    #[tokio::test]
    async fn test_upload_then_update() {
        let (_, ctx) = context();
        let created = ctx.upload_custom_question(&react_question("What is a ref?")).await;
        assert!(created.success);
        assert_eq!(created.message, "Question added successfully");

        let updated = ctx.upload_custom_question(&react_question("What is a ref?")).await;
        assert_eq!(updated.question_id, created.question_id);
        assert_eq!(updated.message, "Question updated successfully");
    }

    #[tokio::test]
    async fn test_execute_questions_and_review() {
        let (_, ctx) = context();
        let tool = parse_tool_call(
            "get_interview_questions",
            r#"{"skillLevel": "junior", "technologies": ["React"], "count": 5}"#,
        )
        .unwrap();
        let json: Value = serde_json::from_str(&ctx.execute(&tool).await.unwrap()).unwrap();
        assert_eq!(json["questions"].as_array().unwrap().len(), 2);
        assert_eq!(json["questions"][0]["hasDetailedAnswer"], true);

        let tool = parse_tool_call(
            "review_code",
            r#"{"code": "console.log(1);", "language": "javascript"}"#,
        )
        .unwrap();
        let json: Value = serde_json::from_str(&ctx.execute(&tool).await.unwrap()).unwrap();
        assert_eq!(json["issues"][0]["severity"], "info");
    }
}

//! HTTP API server for integration with other systems.
//!
//! Every endpoint validates its input the same way the agent tools do and
//! returns the tool's JSON output.

use crate::agent::{parse_tool_args, ToolContext};
use crate::app::App;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::PrepdeskError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    tools: Arc<ToolContext>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let app = App::new(settings)?;
    let router = router(app.tools());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Prepdesk API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Questions", "POST /questions");
    Output::kv("Answer", "GET  /questions/{id}");
    Output::kv("Feedback", "POST /feedback");
    Output::kv("Custom question", "POST /questions/custom");
    Output::kv("Import", "POST /import");
    Output::kv("Bitcoin price", "GET  /price?currency=usd");
    Output::kv("Code review", "POST /review");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router).await?;

    Ok(())
}

fn router(tools: Arc<ToolContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/questions", post(questions))
        .route("/questions/custom", post(custom_question))
        .route("/questions/{id}", get(answer))
        .route("/feedback", post(feedback))
        .route("/import", post(import))
        .route("/price", get(price))
        .route("/review", post(review))
        .layer(cors)
        .with_state(Arc::new(AppState { tools }))
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct PriceQuery {
    currency: Option<String>,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

fn status_for(error: &PrepdeskError) -> StatusCode {
    match error {
        PrepdeskError::InvalidInput(_) | PrepdeskError::Import(_) => StatusCode::BAD_REQUEST,
        PrepdeskError::NotFound(_) => StatusCode::NOT_FOUND,
        PrepdeskError::PriceFeed(_) | PrepdeskError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Validate `args` for the named tool, run it and return its JSON output.
async fn run_tool(state: &AppState, name: &str, args: Value) -> Response {
    let call = match parse_tool_args(name, args) {
        Ok(call) => call,
        Err(e) => return error_response(status_for(&e), e.to_string()),
    };

    match state.tools.execute(&call).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            warn!("{} failed: {}", name, e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

async fn run_tool_with_body(
    state: &AppState,
    name: &str,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(args)) => run_tool(state, name, args).await,
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn questions(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    run_tool_with_body(&state, "get_interview_questions", body).await
}

async fn answer(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    run_tool(&state, "get_answer", json!({ "questionId": id })).await
}

async fn feedback(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    run_tool_with_body(&state, "submit_feedback", body).await
}

async fn custom_question(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    run_tool_with_body(&state, "upload_custom_question", body).await
}

async fn import(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    run_tool_with_body(&state, "import_questions", body).await
}

async fn price(State(state): State<Arc<AppState>>, Query(query): Query<PriceQuery>) -> Response {
    run_tool(&state, "get_bitcoin_price", json!({ "currency": query.currency })).await
}

async fn review(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    run_tool_with_body(&state, "review_code", body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceFeedSettings;
    use crate::price::PriceClient;
    use crate::store::SqliteQuestionStore;

    async fn spawn_api() -> String {
        let store = Arc::new(SqliteQuestionStore::in_memory().unwrap());
        let price = PriceClient::new(&PriceFeedSettings::default()).unwrap();
        let tools = Arc::new(ToolContext::new(store, price, 3));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(tools)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_api().await;
        let body: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_questions_and_answer() {
        let base = spawn_api().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{}/questions", base))
            .json(&json!({"skillLevel": "senior", "technologies": ["Performance"], "count": 3}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 1);

        let id = questions[0]["id"].as_str().unwrap();
        let resp = client.get(format!("{}/questions/{}", base, id)).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["difficulty"], "senior");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let base = spawn_api().await;
        let client = reqwest::Client::new();

        let resp = client.get(format!("{}/questions/missing", base)).send().await.unwrap();
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Question with ID missing not found");

        let resp = client
            .post(format!("{}/questions", base))
            .json(&json!({"skillLevel": "expert"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let resp = client
            .post(format!("{}/review", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_custom_question_then_feedback() {
        let base = spawn_api().await;
        let client = reqwest::Client::new();

        let body: Value = client
            .post(format!("{}/questions/custom", base))
            .json(&json!({
                "question": "How does CSS specificity work?",
                "answer": "Inline > id > class > element",
                "difficulty": "junior",
                "technologies": ["CSS"]
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["success"], true);
        let id = body["questionId"].as_str().unwrap().to_string();

        let body: Value = client
            .post(format!("{}/feedback", base))
            .json(&json!({"questionId": id, "rating": 5, "comment": "great"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["success"], true);
    }
}

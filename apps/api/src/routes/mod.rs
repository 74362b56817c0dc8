pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api", get(health::api_root_handler))
        // Interview flow
        .route("/api/start", post(handlers::handle_start))
        .route("/api/answer", post(handlers::handle_answer))
        .route("/api/timeout", post(handlers::handle_timeout))
        .route("/api/summary", get(handlers::handle_summary))
        // Catalog
        .route("/api/questions", get(handlers::handle_list_questions))
        .route("/api/questions/:id", get(handlers::handle_get_question))
        // Debug
        .route("/debug/session", get(handlers::handle_debug_session))
        .route("/debug/llm", get(handlers::handle_debug_llm))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::interview::service::Interviewer;
    use crate::llm_client::{GenerationParams, LlmError, TextGenerator};

    struct OfflineGenerator;

    #[async_trait]
    impl TextGenerator for OfflineGenerator {
        async fn generate(&self, _: &str, _: &GenerationParams) -> Result<String, LlmError> {
            Err(LlmError::MissingApiKey)
        }
    }

    fn test_state() -> AppState {
        let config = Config {
            groq_api_key: None,
            enable_llm_evaluation: false,
            port: 0,
            rust_log: "info".to_string(),
        };
        let interviewer =
            Interviewer::with_rng(Arc::new(OfflineGenerator), false, StdRng::seed_from_u64(3));
        AppState::new(interviewer, config)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_llm_configuration() {
        let app = build_router(test_state());
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["llm_configured"], false);
    }

    #[tokio::test]
    async fn test_start_then_answer_flow() {
        let app = build_router(test_state());

        let (status, start) = send(&app, "POST", "/api/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(start["timer"], 60);
        assert!(start["question"].as_str().unwrap().contains("A1 through A10"));

        let (_, turn) = send(
            &app,
            "POST",
            "/api/answer",
            Some(json!({"answer": "I would type a sum formula over the range A1:A10"})),
        )
        .await;
        assert_eq!(turn["completed"], false);
        assert_eq!(turn["timer"], 60);
        assert!(turn.get("summary").is_none());

        let (_, debug) = send(&app, "GET", "/debug/session", None).await;
        assert_eq!(debug["responses_count"], 1);
        assert_eq!(debug["state"], "warmup");
        assert_eq!(debug["current_question_id"], "w1");
    }

    #[tokio::test]
    async fn test_six_timeouts_complete_the_interview() {
        let app = build_router(test_state());
        send(&app, "POST", "/api/start", None).await;

        let mut last = Value::Null;
        for _ in 0..6 {
            last = send(&app, "POST", "/api/timeout", None).await.1;
        }
        assert_eq!(last["completed"], true);
        assert!(last.get("question").is_none());
        let summary = last["summary"].as_str().unwrap();
        assert!(summary.contains("Level: Beginner"));
        assert!(summary.contains("Not Recommended"));

        let (_, report) = send(&app, "GET", "/api/summary", None).await;
        assert_eq!(report["summary"], last["summary"]);
        assert_eq!(report["score"], 0.0);
    }

    #[tokio::test]
    async fn test_question_lookup() {
        let app = build_router(test_state());

        let (status, body) = send(&app, "GET", "/api/questions/c2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "pivot_table");

        let (status, body) = send(&app, "GET", "/api/questions/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_question_list_by_difficulty() {
        let app = build_router(test_state());

        let (status, body) = send(&app, "GET", "/api/questions?difficulty=advanced", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, "GET", "/api/questions?difficulty=guru", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, "GET", "/api/questions", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("difficulty"));
    }

    #[tokio::test]
    async fn test_llm_check_reports_failure_in_body() {
        let app = build_router(test_state());
        let (status, body) = send(&app, "GET", "/debug/llm", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["llm_working"], false);
        assert!(body["error"].as_str().unwrap().contains("No API key"));
    }
}

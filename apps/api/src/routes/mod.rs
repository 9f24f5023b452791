pub mod credential;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/levels", get(handlers::handle_levels))
        .route("/api/v1/word-count", post(handlers::handle_word_count))
        .route(
            "/api/v1/credential",
            get(credential::handle_get_credential).put(credential::handle_put_credential),
        )
        .route("/api/v1/feedback", post(handlers::handle_submit_feedback))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_reset_session),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(handlers::handle_session_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;
    use crate::credentials::CredentialStore;
    use crate::feedback::service::tests::{sample_response, StubModel};
    use crate::feedback::session::SessionRegistry;
    use crate::llm_client::{FeedbackModel, LlmError};

    struct Harness {
        state: AppState,
        model: Arc<StubModel>,
        _dir: TempDir,
    }

    async fn harness(model: StubModel, api_key: Option<&str>) -> Harness {
        let model = Arc::new(model);
        let (state, dir) = state_with(model.clone(), api_key).await;
        Harness {
            state,
            model,
            _dir: dir,
        }
    }

    async fn state_with(
        model: Arc<dyn FeedbackModel>,
        api_key: Option<&str>,
    ) -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let credentials = CredentialStore::load(dir.path().join("credentials.json"), None)
            .await
            .unwrap();
        if let Some(key) = api_key {
            credentials.set(key.to_string()).await.unwrap();
        }
        let state = AppState {
            model,
            credentials,
            sessions: Arc::new(SessionRegistry::new()),
        };
        (state, dir)
    }

    /// First call signals `started`, then waits for `release` and fails with a 500.
    /// Every later call answers at once with the sample response.
    struct GatedModel {
        calls: AtomicUsize,
        started: Notify,
        release: Notify,
    }

    impl GatedModel {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                started: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl FeedbackModel for GatedModel {
        async fn generate(
            &self,
            _api_key: &str,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.started.notify_one();
                self.release.notified().await;
                return Err(LlmError::Api {
                    status: 500,
                    message: "upstream down".to_string(),
                });
            }
            Ok(sample_response())
        }

        fn model_name(&self) -> &str {
            "gated"
        }
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn submission(level: &str) -> Value {
        json!({
            "requirements": "Write at least 8 words.",
            "prompt": "Homework",
            "student_writing": "  First, students has too much homework every day.  ",
            "level": level,
            "session_id": "tab-1"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(StubModel::replying("{}"), None).await;
        let response = send(&h.state, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "stub");
    }

    #[tokio::test]
    async fn test_levels_lists_six_labels() {
        let h = harness(StubModel::replying("{}"), None).await;
        let body = body_json(send(&h.state, "GET", "/api/v1/levels", None).await).await;
        assert_eq!(body["levels"].as_array().unwrap().len(), 6);
        assert_eq!(body["levels"][4], "C1 Advanced");
        assert_eq!(body["default"], "B1 Intermediate");
    }

    #[tokio::test]
    async fn test_word_count_endpoint() {
        let h = harness(StubModel::replying("{}"), None).await;
        let response = send(
            &h.state,
            "POST",
            "/api/v1/word-count",
            Some(json!({"text": "  hello   world  "})),
        )
        .await;
        assert_eq!(body_json(response).await["word_count"], 2);
    }

    #[tokio::test]
    async fn test_submit_without_credential_never_calls_model() {
        let h = harness(StubModel::replying(sample_response()), None).await;
        let response = send(
            &h.state,
            "POST",
            "/api/v1/feedback",
            Some(submission("B1 Intermediate")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "MISSING_CREDENTIAL");
        assert_eq!(h.model.call_count(), 0);

        let session = body_json(send(&h.state, "GET", "/api/v1/sessions/tab-1", None).await).await;
        assert_eq!(session["state"], "error");
    }

    #[tokio::test]
    async fn test_submit_blank_writing_is_rejected() {
        let h = harness(StubModel::replying(sample_response()), Some("key")).await;
        let mut body = submission("B1 Intermediate");
        body["student_writing"] = json!("   \n ");
        let response = send(&h.state, "POST", "/api/v1/feedback", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_success_populates_session_and_report() {
        let h = harness(StubModel::replying(sample_response()), None).await;

        let response = send(
            &h.state,
            "PUT",
            "/api/v1/credential",
            Some(json!({"api_key": "AIzaSyTest9876"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            &h.state,
            "POST",
            "/api/v1/feedback",
            Some(submission("C1 Advanced")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["feedback"]["overallScore"], 80);
        assert_eq!(body["word_count"], 8);
        assert_eq!(body["generation"], 1);
        assert_eq!(body["feedback"]["categories"].as_array().unwrap().len(), 6);

        let schema = h.model.last_schema.lock().unwrap().clone().unwrap();
        assert!(schema["properties"].get("advancedEnrichment").is_some());

        let session = body_json(send(&h.state, "GET", "/api/v1/sessions/tab-1", None).await).await;
        assert_eq!(session["state"], "ready");
        assert_eq!(session["outcome"]["feedback"]["overallScore"], 80);

        let report = send(&h.state, "GET", "/api/v1/sessions/tab-1/report", None).await;
        assert_eq!(report.status(), StatusCode::OK);
        assert!(body_text(report).await.contains("Overall Score: 80/100"));
    }

    #[tokio::test]
    async fn test_malformed_model_output_is_generic_failure() {
        let h = harness(StubModel::replying("{\"overallScore\": 9"), Some("key")).await;
        let response = send(
            &h.state,
            "POST",
            "/api/v1/feedback",
            Some(submission("B1 Intermediate")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MALFORMED_RESPONSE");
        assert_eq!(
            body["error"]["message"],
            "Failed to get feedback from the AI. Please try again."
        );

        let session = body_json(send(&h.state, "GET", "/api/v1/sessions/tab-1", None).await).await;
        assert_eq!(session["state"], "error");
        assert!(session.get("outcome").is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let h = harness(StubModel::failing(500), Some("key")).await;
        let response = send(
            &h.state,
            "POST",
            "/api/v1/feedback",
            Some(submission("B1 Intermediate")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "PROVIDER_ERROR");
    }

    #[tokio::test]
    async fn test_report_requires_ready_session() {
        let h = harness(StubModel::replying("{}"), None).await;
        let response = send(&h.state, "GET", "/api/v1/sessions/none/report", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_session_returns_to_idle() {
        let h = harness(StubModel::replying(sample_response()), Some("key")).await;
        send(
            &h.state,
            "POST",
            "/api/v1/feedback",
            Some(submission("B1 Intermediate")),
        )
        .await;
        let response = send(&h.state, "DELETE", "/api/v1/sessions/tab-1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let session = body_json(send(&h.state, "GET", "/api/v1/sessions/tab-1", None).await).await;
        assert_eq!(session["state"], "idle");
    }

    #[tokio::test]
    async fn test_credential_status_is_masked() {
        let h = harness(StubModel::replying("{}"), Some("AIzaSySecret4321")).await;
        let body = body_json(send(&h.state, "GET", "/api/v1/credential", None).await).await;
        assert_eq!(body["configured"], true);
        assert_eq!(body["hint"], "****4321");
        assert!(!body.to_string().contains("AIzaSySecret"));
    }

    #[tokio::test]
    async fn test_superseded_submission_gets_conflict_even_when_it_failed() {
        let model = Arc::new(GatedModel::new());
        let (state, _dir) = state_with(model.clone(), Some("key")).await;

        let first = tokio::spawn({
            let state = state.clone();
            async move {
                send(
                    &state,
                    "POST",
                    "/api/v1/feedback",
                    Some(submission("B1 Intermediate")),
                )
                .await
            }
        });
        model.started.notified().await;

        let second = send(
            &state,
            "POST",
            "/api/v1/feedback",
            Some(submission("B1 Intermediate")),
        )
        .await;
        assert_eq!(second.status(), StatusCode::OK);

        model.release.notify_one();
        let first = first.await.unwrap();
        assert_eq!(first.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(first).await["error"]["code"], "SUPERSEDED");

        let session = body_json(send(&state, "GET", "/api/v1/sessions/tab-1", None).await).await;
        assert_eq!(session["state"], "ready");
        assert_eq!(session["outcome"]["feedback"]["overallScore"], 80);
    }

    #[tokio::test]
    async fn test_reset_during_submission_discards_its_result() {
        let model = Arc::new(GatedModel::new());
        let (state, _dir) = state_with(model.clone(), Some("key")).await;

        let first = tokio::spawn({
            let state = state.clone();
            async move {
                send(
                    &state,
                    "POST",
                    "/api/v1/feedback",
                    Some(submission("B1 Intermediate")),
                )
                .await
            }
        });
        model.started.notified().await;

        let response = send(&state, "DELETE", "/api/v1/sessions/tab-1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        model.release.notify_one();
        assert_eq!(first.await.unwrap().status(), StatusCode::CONFLICT);

        let session = body_json(send(&state, "GET", "/api/v1/sessions/tab-1", None).await).await;
        assert_eq!(session["state"], "idle");
    }
}

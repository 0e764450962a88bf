//! Route handlers and JSON bodies.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use preview_guard_pipeline::{
    CodeTransformer, FailureKind, SanitizationError, SanitizationResult, Sanitizer,
};
use preview_guard_rules::{
    validate_and_fix, validate_minimal, validate_sanitized_code, AutoFixResult,
    MinimalValidationResult, ValidationResult,
};

/// Shared handler state.
pub struct AppState {
    pub sanitizer: Sanitizer<Arc<dyn CodeTransformer>>,
}

impl AppState {
    pub fn new(sanitizer: Sanitizer<Arc<dyn CodeTransformer>>) -> Self {
        Self { sanitizer }
    }
}

/// Request body for every code endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeRequest {
    pub code: String,
}

/// Failure body returned with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub details: Vec<String>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Both validator verdicts for one piece of code.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub full: ValidationResult,
    pub minimal: MinimalValidationResult,
}

/// Terminal pipeline failure mapped to an HTTP response.
struct ApiError(SanitizationError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            FailureKind::ShapeRejected => StatusCode::BAD_REQUEST,
            FailureKind::Exhausted => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let body = ErrorBody {
            line: self.0.line(),
            error: self.0.message,
            code: self.0.code.to_string(),
            details: self.0.details,
            attempts: self.0.attempts,
        };

        (status, Json(body)).into_response()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/sanitize", post(sanitize_handler))
        .route("/api/fix", post(fix_handler))
        .route("/api/validate", post(validate_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run the full retrying pipeline. Blocks until it succeeds or gives up.
async fn sanitize_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CodeRequest>,
) -> Result<Json<SanitizationResult>, ApiError> {
    tracing::info!("Sanitize request ({} bytes)", request.code.len());

    state
        .sanitizer
        .sanitize(&request.code)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!("Sanitization failed after {} attempt(s)", e.attempts);
            ApiError(e)
        })
}

/// Deterministic repair without the transformation service.
async fn fix_handler(Json(request): Json<CodeRequest>) -> Json<AutoFixResult> {
    let result = validate_and_fix(&request.code);
    tracing::info!(
        "Applied {} fix(es), {} error(s) remaining",
        result.fixes_applied.len(),
        result.remaining_errors.len()
    );
    Json(result)
}

async fn validate_handler(Json(request): Json<CodeRequest>) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        full: validate_sanitized_code(&request.code),
        minimal: validate_minimal(&request.code),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use preview_guard_pipeline::ScriptedTransformer;
    use serde_json::Value;
    use tower::ServiceExt;

    const RAW: &str = "export default function App() {\n  return <div className=\"hero\">Welcome in</div>;\n}";
    const CLEAN: &str = "function Preview() {\n  return <div className=\"hero\">Welcome in</div>;\n}";

    fn app(responses: &[&str]) -> Router {
        let fake: Arc<dyn CodeTransformer> =
            Arc::new(ScriptedTransformer::completing(responses.iter().copied()));
        router(Arc::new(AppState::new(Sanitizer::new(fake))))
    }

    async fn post_json(app: Router, uri: &str, code: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({ "code": code }).to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app(&[])
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sanitize_returns_success_contract() {
        let (status, json) = post_json(app(&[CLEAN]), "/api/sanitize", RAW).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], CLEAN);
        assert_eq!(json["attempts"], 1);
        assert_eq!(json["fixesApplied"][0], "AI sanitization");
        assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn sanitize_surfaces_terminal_error() {
        let dangerous = "function Preview() {\n  eval(x);\n  return <div>Nothing good here</div>;\n}";
        let (status, json) =
            post_json(app(&[dangerous, dangerous]), "/api/sanitize", RAW).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "SANITIZATION_FAILED");
        assert_eq!(json["attempts"], 2);
        assert_eq!(json["line"], 2);
        assert!(json["error"].as_str().unwrap().contains("2 attempt(s)"));
    }

    #[tokio::test]
    async fn sanitize_rejects_non_components() {
        let (status, json) = post_json(app(&[CLEAN]), "/api/sanitize", "hello").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["attempts"], 0);
        assert!(json.get("line").is_none());
    }

    #[tokio::test]
    async fn fix_runs_without_service() {
        let (status, json) = post_json(app(&[]), "/api/fix", RAW).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], CLEAN);
        assert_eq!(json["remainingErrors"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn validate_reports_both_verdicts() {
        let (status, json) = post_json(app(&[]), "/api/validate", RAW).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["full"]["valid"], false);
        assert_eq!(json["full"]["errors"][0]["type"], "export");
        assert_eq!(json["minimal"]["valid"], false);
        assert_eq!(json["minimal"]["hasCriticalErrors"], true);
    }
}

//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{ChatRequest, ChatResponse, ErrorResponse, ModelInfo, ModelsResponse, ThreadResponse};
use super::AppState;
use crate::runtime::SessionError;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat page
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        // Thread lifecycle
        .route("/api/threads", post(create_thread))
        .route("/api/threads/:id", get(get_thread))
        .route("/api/threads/:id/chat", post(send_chat))
        .route("/api/threads/:id/reset", post(reset_thread))
        // Transcript download
        .route("/api/threads/:id/report", get(download_report))
        // Model info
        .route("/api/models", get(list_models))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn serve_index() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Threads
// ============================================================

async fn create_thread(State(state): State<AppState>) -> Json<ThreadResponse> {
    let thread = state.sessions.create_thread().await;
    Json(ThreadResponse { thread })
}

async fn get_thread(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ThreadResponse>, AppError> {
    let thread = state.sessions.snapshot(&id).await?;
    Ok(Json(ThreadResponse { thread }))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let outcome = state.sessions.send_message(&id, &req.text).await?;
    Ok(Json(outcome.into()))
}

async fn reset_thread(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ThreadResponse> {
    let thread = state.sessions.reset(&id).await;
    Json(ThreadResponse { thread })
}

// ============================================================
// Report
// ============================================================

async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let report = state.sessions.render_report(&id).await?;
    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}

// ============================================================
// Model Info
// ============================================================

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let models = state
        .llm_registry
        .available_model_defs()
        .into_iter()
        .map(|def| ModelInfo {
            id: def.id.to_string(),
            provider: def.provider.display_name().to_string(),
            description: def.description.to_string(),
        })
        .collect();

    Json(ModelsResponse {
        models,
        default: state.llm_registry.default_model_id().to_string(),
    })
}

async fn get_version() -> &'static str {
    concat!("bounded-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::EmptyMessage => AppError::BadRequest(message),
            SessionError::ThreadNotFound(_) => AppError::NotFound(message),
            SessionError::ConversationEnded => AppError::Conflict(message),
            SessionError::Adapter(_) => AppError::BadGateway(message),
            SessionError::Render(_) => AppError::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

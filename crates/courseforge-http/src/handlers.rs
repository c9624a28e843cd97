//! Route handlers.

use axum::{
    BoxError, Json,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use courseforge_chat::GenerationFailure;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tracing::{error, warn};

use crate::state::AppState;
use crate::types::{
    ChatRequest, GenerateCourseErrorResponse, GenerateCourseRequest, GenerateCourseResponse,
    StatsResponse,
};

const MIN_PROMPT_CHARS: usize = 10;

/// Buffer between the orchestrator and the SSE writer.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// `POST /chat`: streams the assistant turn as SSE events. Returns 400
/// before any streaming when the message list is missing, malformed or
/// empty; once streaming has begun, failures arrive as `error` events on
/// the stream.
///
/// The body is taken as a raw JSON value so shape problems land here as
/// a 400 instead of the extractor's 422.
pub async fn chat(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let request: ChatRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(_) => return chat_bad_request(),
    };
    let messages = match request.messages {
        Some(messages) if !messages.is_empty() => messages,
        _ => return chat_bad_request(),
    };

    let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
    let orchestrator = state.orchestrator.clone();
    let model = request.model;
    tokio::spawn(async move {
        if let Err(e) = orchestrator.run(&messages, model, tx).await {
            warn!(error = %e, "chat turn failed");
        }
    });

    let stream = ReceiverStream::new(rx).map(|update| {
        let event_name = update.event_name();
        let data = serde_json::to_string(&update).map_err(|e| Box::new(e) as BoxError)?;
        Ok::<Event, BoxError>(Event::default().event(event_name).data(data))
    });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

fn chat_bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "messages must be a non-empty array"})),
    )
        .into_response()
}

/// `POST /ai/generate-course`: single-shot; the model stream is consumed
/// internally and only the final outcome is returned. Validation failures
/// are always a 400, including type mismatches in the body.
pub async fn generate_course(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let request: GenerateCourseRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(GenerateCourseErrorResponse {
                    error: "invalid request".into(),
                    details: e.to_string(),
                    ai_response: None,
                    debug_info: None,
                }),
            )
                .into_response();
        }
    };

    let prompt = request.prompt.unwrap_or_default();
    if prompt.trim().len() < MIN_PROMPT_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(GenerateCourseErrorResponse {
                error: "invalid prompt".into(),
                details: format!("prompt must be at least {MIN_PROMPT_CHARS} characters"),
                ai_response: None,
                debug_info: None,
            }),
        )
            .into_response();
    }

    match state
        .generator
        .generate(&prompt, request.instructor_id.as_deref())
        .await
    {
        Ok(created) => (
            StatusCode::OK,
            Json(GenerateCourseResponse {
                success: true,
                course: created.course,
                message: created.message,
                ai_response: created.ai_response,
            }),
        )
            .into_response(),
        Err(failure) => {
            error!(details = %failure.detail(), "course generation failed");
            let debug_info = match &failure {
                GenerationFailure::ToolNotInvoked { .. } => {
                    json!({"stage": "generation", "toolInvoked": false})
                }
                GenerationFailure::ToolFailed { reason, .. } => {
                    json!({"stage": "tool", "toolInvoked": true, "failure": reason})
                }
                GenerationFailure::Gateway { .. } => json!({"stage": "gateway"}),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateCourseErrorResponse {
                    error: "course generation failed".into(),
                    details: failure.detail(),
                    ai_response: Some(failure.ai_response().to_string()),
                    debug_info: Some(debug_info),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /ai/stats`: read-only counters.
pub async fn stats(State(state): State<AppState>) -> Response {
    match state.catalog.course_counts() {
        Ok(counts) => (
            StatusCode::OK,
            Json(StatsResponse {
                total_courses: counts.total,
                ai_generated_courses: counts.ai_generated,
                message: format!(
                    "{} of {} courses were generated by AI",
                    counts.ai_generated, counts.total
                ),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to read course counts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "failed to read statistics"})),
            )
                .into_response()
        }
    }
}

/// `GET /health`: liveness check.
pub async fn health() -> Response {
    Json(json!({
        "status": "healthy",
        "service": "courseforge-http",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

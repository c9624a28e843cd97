//! Request and response payloads.

use courseforge_core::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chat`. `messages` stays optional so a missing field is
/// reported as a 400 by the handler instead of a framework-level 422.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Option<Vec<ChatMessage>>,
    pub model: Option<String>,
}

/// Body of `POST /ai/generate-course`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCourseRequest {
    pub prompt: Option<String>,
    pub instructor_id: Option<String>,
}

/// Success body of `POST /ai/generate-course`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCourseResponse {
    pub success: bool,
    pub course: Value,
    pub message: String,
    pub ai_response: String,
}

/// Failure body of `POST /ai/generate-course`; diagnostics are included
/// in full on purpose.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCourseErrorResponse {
    pub error: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<Value>,
}

/// Body of `GET /ai/stats`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_courses: i64,
    pub ai_generated_courses: i64,
    pub message: String,
}

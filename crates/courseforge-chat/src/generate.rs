//! Single-shot course generation.
//!
//! Consumes the gateway stream internally and exposes only a final
//! result. Plain text without a creation tool call is a policy failure:
//! free-form model output never writes to the catalog.

use courseforge_catalog::CatalogStore;
use courseforge_core::{ToolFailure, ToolOutcome};
use courseforge_llm::{GatewayEvent, GenerateRequest, ModelGateway, Turn};
use courseforge_tools::{CREATE_COURSE_TOOL, ToolRegistry};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::prompt::generation_system_prompt;

/// Courses and categories sampled into the generation system prompt.
const CONTEXT_COURSES: u32 = 5;

/// A successfully created course, as reported by the creation tool.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCourse {
    /// The persisted course row as a JSON object.
    pub course: Value,
    pub lessons_created: u64,
    pub message: String,
    /// All assistant text accumulated alongside the tool call.
    pub ai_response: String,
}

/// Why generation produced no course. Each variant keeps the accumulated
/// model text for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationFailure {
    /// The model answered with text only and never called the tool.
    ToolNotInvoked { ai_response: String },
    /// The tool was called but reported a failure.
    ToolFailed {
        reason: ToolFailure,
        ai_response: String,
    },
    /// The gateway failed before or during streaming.
    Gateway {
        message: String,
        ai_response: String,
    },
}

impl GenerationFailure {
    pub fn ai_response(&self) -> &str {
        match self {
            GenerationFailure::ToolNotInvoked { ai_response }
            | GenerationFailure::ToolFailed { ai_response, .. }
            | GenerationFailure::Gateway { ai_response, .. } => ai_response,
        }
    }

    /// Short description for error payloads and logs.
    pub fn detail(&self) -> String {
        match self {
            GenerationFailure::ToolNotInvoked { .. } => {
                "model did not invoke the course creation tool".to_string()
            }
            GenerationFailure::ToolFailed { reason, .. } => reason.message(),
            GenerationFailure::Gateway { message, .. } => message.clone(),
        }
    }
}

/// Turns one free-text prompt into one `create_course_with_lessons`
/// invocation.
pub struct CourseGenerator {
    gateway: Arc<dyn ModelGateway>,
    registry: Arc<dyn ToolRegistry>,
    catalog: CatalogStore,
}

impl CourseGenerator {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        registry: Arc<dyn ToolRegistry>,
        catalog: CatalogStore,
    ) -> Self {
        Self {
            gateway,
            registry,
            catalog,
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        instructor_id: Option<&str>,
    ) -> Result<GeneratedCourse, GenerationFailure> {
        // Context sampling is best-effort; an empty catalog still grounds
        // a valid prompt.
        let courses = self.catalog.list_courses(CONTEXT_COURSES).unwrap_or_default();
        let categories = self.catalog.list_categories().unwrap_or_default();
        let system = generation_system_prompt(&courses, &categories);

        let mut user_prompt = prompt.to_string();
        if let Some(id) = instructor_id {
            user_prompt.push_str(&format!("\n\nAssign the course to instructor id '{id}'."));
        }

        let request = GenerateRequest::new(system, vec![Turn::user_text(user_prompt)])
            .with_tools(self.registry.declarations());

        let mut stream = match self.gateway.generate(request).await {
            Ok(stream) => stream,
            Err(e) => {
                return Err(GenerationFailure::Gateway {
                    message: e.to_string(),
                    ai_response: String::new(),
                });
            }
        };

        let mut ai_response = String::new();
        let mut tool_outcome: Option<ToolOutcome> = None;
        let mut gateway_error: Option<String> = None;

        while let Some(event) = stream.next().await {
            match event {
                GatewayEvent::TextFragment { text } => ai_response.push_str(&text),
                GatewayEvent::ToolCall {
                    name, arguments, ..
                } => {
                    if name != CREATE_COURSE_TOOL {
                        warn!(tool = %name, "generation model called an unexpected tool");
                        continue;
                    }
                    if tool_outcome.is_some() {
                        warn!("ignoring repeated course creation call in one generation");
                        continue;
                    }
                    tool_outcome = self.registry.dispatch(&name, arguments);
                }
                GatewayEvent::Error { message } => {
                    gateway_error = Some(message);
                    break;
                }
                GatewayEvent::Done { .. } => break,
            }
        }

        if let Some(message) = gateway_error {
            // A committed tool call still counts even when the stream died
            // right after it.
            if !matches!(tool_outcome, Some(ToolOutcome::Success { .. })) {
                return Err(GenerationFailure::Gateway {
                    message,
                    ai_response,
                });
            }
        }

        match tool_outcome {
            Some(ToolOutcome::Success { value }) => {
                let lessons_created = value["lessonsCreated"].as_u64().unwrap_or(0);
                let message = value["message"].as_str().unwrap_or_default().to_string();
                info!(lessons = lessons_created, "course generation succeeded");
                Ok(GeneratedCourse {
                    course: value["course"].clone(),
                    lessons_created,
                    message,
                    ai_response,
                })
            }
            Some(ToolOutcome::Failure { reason }) => Err(GenerationFailure::ToolFailed {
                reason,
                ai_response,
            }),
            None => Err(GenerationFailure::ToolNotInvoked { ai_response }),
        }
    }
}

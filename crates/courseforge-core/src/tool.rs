//! The tool seam between the language model and the catalog.
//!
//! Each tool is a (name, parameter-schema, executor) triple. Failures cross
//! the tool boundary as structured values, never as panics or bubbled
//! errors, so the orchestrator can always relay a well-formed event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declaration of a tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's argument object.
    pub input_schema: Value,
}

/// Categorized failure reasons for tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolFailure {
    /// Arguments did not validate against the tool's schema. No side
    /// effect has happened when this is returned.
    InvalidArguments { message: String },
    /// A referenced entity does not exist.
    NotFound { resource: String },
    /// No instructor accounts exist to own a created course.
    NoInstructors,
    /// The catalog store rejected a query or insert.
    Store { message: String },
    /// The course row was committed but lesson insertion failed. The
    /// course is NOT rolled back; callers see exactly which stage broke.
    LessonsFailed { course_id: String, message: String },
    /// Tool-specific failure that fits no other category.
    Custom { category: String, message: String },
}

impl ToolFailure {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        ToolFailure::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        ToolFailure::Store {
            message: message.into(),
        }
    }

    /// Short machine-readable code for the failure category.
    pub fn code(&self) -> &'static str {
        match self {
            ToolFailure::InvalidArguments { .. } => "invalid_arguments",
            ToolFailure::NotFound { .. } => "not_found",
            ToolFailure::NoInstructors => "no_instructors",
            ToolFailure::Store { .. } => "store_error",
            ToolFailure::LessonsFailed { .. } => "lessons_failed",
            ToolFailure::Custom { .. } => "tool_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ToolFailure::InvalidArguments { message } => {
                format!("invalid arguments: {message}")
            }
            ToolFailure::NotFound { resource } => format!("not found: {resource}"),
            ToolFailure::NoInstructors => {
                "no instructor accounts exist to own the course".to_string()
            }
            ToolFailure::Store { message } => format!("store error: {message}"),
            ToolFailure::LessonsFailed { course_id, message } => {
                format!("course {course_id} created, lessons failed: {message}")
            }
            ToolFailure::Custom { category, message } => format!("{category}: {message}"),
        }
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The result of executing a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Tool executed and produced a JSON payload for the model.
    Success { value: Value },
    /// Tool refused or failed with a structured reason.
    Failure { reason: ToolFailure },
}

impl ToolOutcome {
    pub fn success(value: Value) -> Self {
        ToolOutcome::Success { value }
    }

    pub fn failed(reason: ToolFailure) -> Self {
        ToolOutcome::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    pub fn success_value(&self) -> Option<&Value> {
        match self {
            ToolOutcome::Success { value } => Some(value),
            ToolOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&ToolFailure> {
        match self {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { reason } => Some(reason),
        }
    }

    /// Render the outcome as the JSON payload fed back into the model's
    /// context. Failures become `{success: false, error, message}` so the
    /// model can react to them instead of the stream dying.
    pub fn to_model_payload(&self) -> Value {
        match self {
            ToolOutcome::Success { value } => value.clone(),
            ToolOutcome::Failure { reason } => serde_json::json!({
                "success": false,
                "error": reason.code(),
                "message": reason.message(),
            }),
        }
    }
}

/// An operation the model may invoke against the catalog.
///
/// Implementations deserialize their own typed argument struct from the
/// raw `Value`; a deserialization failure must short-circuit with
/// [`ToolFailure::InvalidArguments`] before any side effect.
pub trait CatalogTool: Send + Sync {
    /// Unique tool name as the model sees it.
    fn name(&self) -> &str;

    /// Human-readable description included in the declaration.
    fn description(&self) -> &str;

    /// JSON Schema for the argument object.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with already-parsed JSON arguments.
    fn invoke(&self, args: Value) -> ToolOutcome;

    /// Declaration advertised to the model gateway.
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    impl CatalogTool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its arguments back"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object"})
        }

        fn invoke(&self, args: Value) -> ToolOutcome {
            ToolOutcome::success(args)
        }
    }

    #[test]
    fn declaration_carries_schema() {
        let decl = EchoTool.declaration();
        assert_eq!(decl.name, "echo");
        assert_eq!(decl.input_schema, json!({"type": "object"}));
    }

    #[test]
    fn failure_payload_is_structured() {
        let outcome = ToolOutcome::failed(ToolFailure::NoInstructors);
        let payload = outcome.to_model_payload();
        assert_eq!(payload["success"], json!(false));
        assert_eq!(payload["error"], json!("no_instructors"));
    }

    #[test]
    fn lessons_failed_names_the_course() {
        let reason = ToolFailure::LessonsFailed {
            course_id: "c-42".into(),
            message: "disk full".into(),
        };
        assert!(reason.message().contains("c-42"));
        assert!(reason.message().contains("lessons failed"));
    }

    #[test]
    fn failure_serializes_tagged() {
        let reason = ToolFailure::invalid_arguments("limit must be a number");
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "invalid_arguments");
    }
}

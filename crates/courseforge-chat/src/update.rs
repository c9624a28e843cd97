//! Caller-visible events of a streaming chat turn.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One update of the chat stream, serialized as a tagged JSON object and
/// delivered over SSE by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatUpdate {
    /// Incremental assistant text; concatenation yields the running reply.
    Text { text: String },
    /// The model invoked a tool.
    ToolCall {
        id: String,
        name: String,
        arguments: Value,
    },
    /// The tool's result, already fed back into the model context.
    ToolResult {
        id: String,
        name: String,
        output: Value,
    },
    /// The assistant turn finished normally.
    Completed,
    /// The turn failed; the stream ends after this event.
    Error { message: String },
}

impl ChatUpdate {
    /// SSE event name for this update.
    pub fn event_name(&self) -> &'static str {
        match self {
            ChatUpdate::Text { .. } => "text",
            ChatUpdate::ToolCall { .. } => "tool_call",
            ChatUpdate::ToolResult { .. } => "tool_result",
            ChatUpdate::Completed => "completed",
            ChatUpdate::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn updates_serialize_tagged() {
        let update = ChatUpdate::ToolCall {
            id: "tu_1".into(),
            name: "list_categories".into(),
            arguments: json!({}),
        };
        let wire = serde_json::to_value(&update).unwrap();
        assert_eq!(wire["type"], "tool_call");
        assert_eq!(update.event_name(), "tool_call");
    }

    #[test]
    fn completed_has_no_payload() {
        let wire = serde_json::to_value(ChatUpdate::Completed).unwrap();
        assert_eq!(wire, json!({"type": "completed"}));
    }
}

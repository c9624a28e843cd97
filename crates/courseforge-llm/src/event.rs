//! Events emitted by a generation stream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of the assistant turn.
    EndTurn,
    /// The model stopped to invoke one or more tools.
    ToolUse,
    /// Output limit reached.
    MaxTokens,
    /// Anything else the provider reports.
    Other,
}

impl StopReason {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "end_turn" | "stop_sequence" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            _ => StopReason::Other,
        }
    }
}

/// One event of a generation stream.
///
/// Within a single call the gateway emits zero-or-more `text_fragment`
/// and `tool_call` events followed by exactly one terminal event
/// (`done` or `error`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// Ordered fragment of assistant text; concatenation reconstructs the
    /// running reply.
    TextFragment { text: String },
    /// The model invoked a declared tool.
    ToolCall {
        id: String,
        name: String,
        arguments: Value,
    },
    /// Terminal: generation finished.
    Done { stop_reason: StopReason },
    /// Terminal: generation failed upstream.
    Error { message: String },
}

impl GatewayEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GatewayEvent::Done { .. } | GatewayEvent::Error { .. })
    }
}

//! Parsing of the provider's server-sent-event generation stream.
//!
//! The provider interleaves text deltas with tool-use blocks whose JSON
//! arguments arrive fragmented across `input_json_delta` events, so the
//! decoder keeps per-call state until the block closes.

use serde_json::Value;
use tracing::warn;

use crate::event::{GatewayEvent, StopReason};

/// Extract the next complete SSE frame from `buffer`, draining it.
/// Frames are separated by blank lines; only `data:` payloads matter.
pub(crate) fn next_sse_data(buffer: &mut String) -> Option<String> {
    loop {
        let frame_end = buffer.find("\n\n")?;
        let frame = buffer[..frame_end].to_string();
        buffer.drain(..frame_end + 2);

        let mut data = String::new();
        for line in frame.lines() {
            if let Some(value) = line.strip_prefix("data:") {
                if !data.is_empty() {
                    data.push('\n');
                }
                data.push_str(value.trim());
            }
        }

        if !data.is_empty() {
            return Some(data);
        }
        // Comment-only or empty frame (keep-alives): skip and continue.
    }
}

/// Tool-use block whose argument JSON is still being streamed.
struct PendingToolCall {
    id: String,
    name: String,
    partial_json: String,
}

/// Stateful decoder turning provider stream events into [`GatewayEvent`]s.
#[derive(Default)]
pub(crate) struct StreamDecoder {
    pending_tool: Option<PendingToolCall>,
    stop_reason: Option<StopReason>,
}

impl StreamDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decode one SSE `data:` payload. Returns zero or more events.
    pub(crate) fn decode(&mut self, data: &str) -> Vec<GatewayEvent> {
        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable stream event");
                return vec![GatewayEvent::Error {
                    message: format!("malformed stream event: {e}"),
                }];
            }
        };

        match value.get("type").and_then(Value::as_str) {
            Some("content_block_start") => {
                let block = value.get("content_block");
                if block.and_then(|b| b.get("type")).and_then(Value::as_str) == Some("tool_use") {
                    self.pending_tool = Some(PendingToolCall {
                        id: field(block, "id"),
                        name: field(block, "name"),
                        partial_json: String::new(),
                    });
                }
                Vec::new()
            }
            Some("content_block_delta") => {
                let delta = value.get("delta");
                match delta.and_then(|d| d.get("type")).and_then(Value::as_str) {
                    Some("text_delta") => {
                        let text = delta
                            .and_then(|d| d.get("text"))
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        vec![GatewayEvent::TextFragment {
                            text: text.to_string(),
                        }]
                    }
                    Some("input_json_delta") => {
                        if let Some(pending) = self.pending_tool.as_mut() {
                            if let Some(fragment) = delta
                                .and_then(|d| d.get("partial_json"))
                                .and_then(Value::as_str)
                            {
                                pending.partial_json.push_str(fragment);
                            }
                        }
                        Vec::new()
                    }
                    _ => Vec::new(),
                }
            }
            Some("content_block_stop") => match self.pending_tool.take() {
                Some(pending) => vec![finish_tool_call(pending)],
                None => Vec::new(),
            },
            Some("message_delta") => {
                if let Some(reason) = value
                    .get("delta")
                    .and_then(|d| d.get("stop_reason"))
                    .and_then(Value::as_str)
                {
                    self.stop_reason = Some(StopReason::from_wire(reason));
                }
                Vec::new()
            }
            Some("message_stop") => {
                vec![GatewayEvent::Done {
                    stop_reason: self.stop_reason.take().unwrap_or(StopReason::EndTurn),
                }]
            }
            Some("error") => {
                let message = value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("upstream error")
                    .to_string();
                vec![GatewayEvent::Error { message }]
            }
            // message_start, ping, and anything future-shaped.
            _ => Vec::new(),
        }
    }
}

fn finish_tool_call(pending: PendingToolCall) -> GatewayEvent {
    // A tool call with no arguments streams an empty JSON buffer.
    let arguments = if pending.partial_json.trim().is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        match serde_json::from_str(&pending.partial_json) {
            Ok(value) => value,
            Err(e) => {
                return GatewayEvent::Error {
                    message: format!(
                        "model produced malformed arguments for tool '{}': {e}",
                        pending.name
                    ),
                };
            }
        }
    };

    GatewayEvent::ToolCall {
        id: pending.id,
        name: pending.name,
        arguments,
    }
}

fn field(block: Option<&Value>, key: &str) -> String {
    block
        .and_then(|b| b.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frames_split_on_blank_lines() {
        let mut buffer =
            "event: ping\ndata: {\"type\":\"ping\"}\n\ndata: {\"type\":\"message_stop\"}\n\nda"
                .to_string();
        assert_eq!(next_sse_data(&mut buffer).unwrap(), "{\"type\":\"ping\"}");
        assert_eq!(
            next_sse_data(&mut buffer).unwrap(),
            "{\"type\":\"message_stop\"}"
        );
        // Incomplete trailing frame stays buffered.
        assert_eq!(next_sse_data(&mut buffer), None);
        assert_eq!(buffer, "da");
    }

    #[test]
    fn comment_frames_are_skipped() {
        let mut buffer = ": keep-alive\n\ndata: {\"type\":\"ping\"}\n\n".to_string();
        assert_eq!(next_sse_data(&mut buffer).unwrap(), "{\"type\":\"ping\"}");
    }

    #[test]
    fn text_deltas_become_fragments() {
        let mut decoder = StreamDecoder::new();
        let events = decoder.decode(
            &json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "text_delta", "text": "Hel"}
            })
            .to_string(),
        );
        assert_eq!(
            events,
            vec![GatewayEvent::TextFragment { text: "Hel".into() }]
        );
    }

    #[test]
    fn tool_call_assembles_from_json_fragments() {
        let mut decoder = StreamDecoder::new();

        decoder.decode(
            &json!({
                "type": "content_block_start",
                "index": 0,
                "content_block": {"type": "tool_use", "id": "tu_1", "name": "search_courses"}
            })
            .to_string(),
        );
        decoder.decode(
            &json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "input_json_delta", "partial_json": "{\"query\":"}
            })
            .to_string(),
        );
        decoder.decode(
            &json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "input_json_delta", "partial_json": "\"rust\"}"}
            })
            .to_string(),
        );
        let events = decoder.decode(&json!({"type": "content_block_stop", "index": 0}).to_string());

        assert_eq!(
            events,
            vec![GatewayEvent::ToolCall {
                id: "tu_1".into(),
                name: "search_courses".into(),
                arguments: json!({"query": "rust"}),
            }]
        );
    }

    #[test]
    fn empty_argument_buffer_becomes_empty_object() {
        let mut decoder = StreamDecoder::new();
        decoder.decode(
            &json!({
                "type": "content_block_start",
                "index": 0,
                "content_block": {"type": "tool_use", "id": "tu_2", "name": "list_categories"}
            })
            .to_string(),
        );
        let events = decoder.decode(&json!({"type": "content_block_stop", "index": 0}).to_string());
        assert_eq!(
            events,
            vec![GatewayEvent::ToolCall {
                id: "tu_2".into(),
                name: "list_categories".into(),
                arguments: json!({}),
            }]
        );
    }

    #[test]
    fn stop_reason_flows_into_done() {
        let mut decoder = StreamDecoder::new();
        decoder.decode(
            &json!({
                "type": "message_delta",
                "delta": {"stop_reason": "tool_use"}
            })
            .to_string(),
        );
        let events = decoder.decode(&json!({"type": "message_stop"}).to_string());
        assert_eq!(
            events,
            vec![GatewayEvent::Done {
                stop_reason: StopReason::ToolUse
            }]
        );
    }

    #[test]
    fn upstream_error_event_is_relayed() {
        let mut decoder = StreamDecoder::new();
        let events = decoder.decode(
            &json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })
            .to_string(),
        );
        assert_eq!(
            events,
            vec![GatewayEvent::Error {
                message: "Overloaded".into()
            }]
        );
    }

    #[test]
    fn malformed_tool_arguments_fail_the_call() {
        let mut decoder = StreamDecoder::new();
        decoder.decode(
            &json!({
                "type": "content_block_start",
                "index": 0,
                "content_block": {"type": "tool_use", "id": "tu_3", "name": "broken"}
            })
            .to_string(),
        );
        decoder.decode(
            &json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "input_json_delta", "partial_json": "{not json"}
            })
            .to_string(),
        );
        let events = decoder.decode(&json!({"type": "content_block_stop", "index": 0}).to_string());
        assert!(matches!(events[0], GatewayEvent::Error { .. }));
    }
}

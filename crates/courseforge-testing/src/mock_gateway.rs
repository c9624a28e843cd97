//! A scripted [`ModelGateway`] for orchestrator and handler tests.

use async_trait::async_trait;
use courseforge_llm::{
    EventStream, GatewayError, GatewayEvent, GatewayResult, GenerateRequest, ModelGateway,
    StopReason,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Scripted {
    Events(Vec<GatewayEvent>),
    Failure(GatewayError),
}

/// Gateway that replays pre-scripted event streams in enqueue order and
/// records every request it receives.
///
/// When the script runs out, further calls stream a terminal error so a
/// test that loops too far fails loudly instead of hanging.
#[derive(Default)]
pub struct MockGateway {
    scripts: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue one full event stream for the next `generate` call.
    pub fn reply_with(self, events: Vec<GatewayEvent>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Scripted::Events(events));
        self
    }

    /// Enqueue a pre-stream failure for the next `generate` call.
    pub fn fail_with(self, error: GatewayError) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(error));
        self
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn generate(&self, request: GenerateRequest) -> GatewayResult<EventStream> {
        self.requests.lock().unwrap().push(request);
        let next = self.scripts.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Events(events)) => Ok(Box::pin(futures::stream::iter(events))),
            Some(Scripted::Failure(error)) => Err(error),
            None => Ok(Box::pin(futures::stream::iter(vec![GatewayEvent::Error {
                message: "mock gateway script exhausted".to_string(),
            }]))),
        }
    }
}

/// A plain text reply ending with `end_turn`.
pub fn text_reply(text: &str) -> Vec<GatewayEvent> {
    vec![
        GatewayEvent::TextFragment { text: text.into() },
        GatewayEvent::Done {
            stop_reason: StopReason::EndTurn,
        },
    ]
}

/// A single tool call ending with `tool_use`.
pub fn tool_call_reply(id: &str, name: &str, arguments: Value) -> Vec<GatewayEvent> {
    vec![
        GatewayEvent::ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        },
        GatewayEvent::Done {
            stop_reason: StopReason::ToolUse,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseforge_llm::Turn;
    use futures::StreamExt;

    #[tokio::test]
    async fn replays_scripts_in_order() {
        let gateway = MockGateway::new()
            .reply_with(text_reply("first"))
            .reply_with(text_reply("second"));

        for expected in ["first", "second"] {
            let stream = gateway
                .generate(GenerateRequest::new("sys", vec![Turn::user_text("hi")]))
                .await
                .unwrap();
            let events: Vec<GatewayEvent> = stream.collect().await;
            assert_eq!(
                events[0],
                GatewayEvent::TextFragment {
                    text: expected.into()
                }
            );
        }
        assert_eq!(gateway.request_count(), 2);
    }

    #[tokio::test]
    async fn exhausted_script_streams_an_error() {
        let gateway = MockGateway::new();
        let stream = gateway
            .generate(GenerateRequest::new("sys", vec![Turn::user_text("hi")]))
            .await
            .unwrap();
        let events: Vec<GatewayEvent> = stream.collect().await;
        assert!(matches!(events[0], GatewayEvent::Error { .. }));
    }
}

//! Model Gateway: wraps the hosted text-generation capability.
//!
//! Given a system prompt, conversation turns and a set of declared tools,
//! [`ModelGateway::generate`] returns a stream of [`GatewayEvent`]s: zero
//! or more text fragments and tool calls, closed by exactly one terminal
//! event (`done` or `error`).

mod anthropic;
mod config;
mod error;
mod event;
mod request;
mod sse;

pub use anthropic::AnthropicGateway;
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use event::{GatewayEvent, StopReason};
pub use gateway::{EventStream, ModelGateway};
pub use request::{ContentPart, GenerateRequest, ToolChoice, Turn, TurnRole, turns_from_messages};

mod gateway {
    use async_trait::async_trait;
    use futures::Stream;
    use std::pin::Pin;

    use crate::error::GatewayResult;
    use crate::event::GatewayEvent;
    use crate::request::GenerateRequest;

    /// Pull-model stream of generation events.
    pub type EventStream = Pin<Box<dyn Stream<Item = GatewayEvent> + Send>>;

    /// The hosted text-generation capability, behind a trait so tests can
    /// script it.
    #[async_trait]
    pub trait ModelGateway: Send + Sync {
        /// Start one generation. Errors returned here happened before any
        /// streaming began; once a stream is handed out, failures arrive
        /// as a terminal [`GatewayEvent::Error`].
        async fn generate(&self, request: GenerateRequest) -> GatewayResult<EventStream>;
    }
}

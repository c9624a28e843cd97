//! Anthropic messages-API implementation of the model gateway.
//!
//! Authentication is an `x-api-key` header plus a pinned
//! `anthropic-version`. Generation always streams; the response body is
//! consumed on a spawned task that relays decoded events over a channel,
//! so a dropped receiver simply abandons the upstream stream.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use courseforge_core::ToolDeclaration;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::event::GatewayEvent;
use crate::gateway::{EventStream, ModelGateway};
use crate::request::{GenerateRequest, ToolChoice, Turn};
use crate::sse::{StreamDecoder, next_sse_data};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Turn],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDeclaration]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

/// Gateway speaking the Anthropic messages API.
pub struct AnthropicGateway {
    http: Client,
    config: GatewayConfig,
}

impl AnthropicGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub fn from_env() -> GatewayResult<Self> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelGateway for AnthropicGateway {
    async fn generate(&self, request: GenerateRequest) -> GatewayResult<EventStream> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let tool_choice = match request.tool_choice {
            // Auto is the provider default; omit it so requests without
            // tools stay valid.
            ToolChoice::Auto => None,
            ref other => Some(other.to_wire()),
        };
        let body = MessagesRequest {
            model,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            system: &request.system,
            messages: &request.turns,
            stream: true,
            temperature: Some(request.temperature.unwrap_or(self.config.temperature)),
            tools: (!request.tools.is_empty()).then_some(request.tools.as_slice()),
            tool_choice,
        };

        debug!(model = %model, turns = request.turns.len(), tools = request.tools.len(),
               "starting generation");

        let response = self
            .http
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GatewayError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let (tx, rx) = tokio::sync::mpsc::channel::<GatewayEvent>(EVENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();
            let mut decoder = StreamDecoder::new();
            let mut terminal_sent = false;

            while let Some(chunk_result) = stream.next().await {
                let chunk = match chunk_result {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx
                            .send(GatewayEvent::Error {
                                message: format!("stream transport error: {e}"),
                            })
                            .await;
                        return;
                    }
                };

                match std::str::from_utf8(&chunk) {
                    Ok(text) => buffer.push_str(text),
                    Err(e) => {
                        warn!(error = %e, "invalid UTF-8 in generation stream");
                        continue;
                    }
                }

                while let Some(data) = next_sse_data(&mut buffer) {
                    for event in decoder.decode(&data) {
                        let is_terminal = event.is_terminal();
                        if tx.send(event).await.is_err() {
                            // Receiver dropped: caller went away, abandon
                            // the upstream stream.
                            return;
                        }
                        if is_terminal {
                            terminal_sent = true;
                        }
                    }
                }
            }

            if !terminal_sent {
                let _ = tx
                    .send(GatewayEvent::Error {
                        message: "generation stream ended without a terminal event".to_string(),
                    })
                    .await;
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

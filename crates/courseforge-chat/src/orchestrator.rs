//! Streaming chat workflow: Idle -> Streaming -> Completed | Failed.

use courseforge_core::{ChatMessage, ToolFailure, ToolOutcome};
use courseforge_llm::{
    ContentPart, GatewayEvent, GenerateRequest, ModelGateway, StopReason, Turn,
    turns_from_messages,
};
use courseforge_tools::ToolRegistry;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::prompt::CHAT_SYSTEM_PROMPT;
use crate::update::ChatUpdate;

/// Upper bound on gateway round-trips for one chat turn. Each round is a
/// full generation that ended in `tool_use`.
const MAX_TOOL_ROUNDS: usize = 8;

/// Drives one chat turn: relays text incrementally and dispatches tool
/// calls synchronously, feeding each result back into the model context
/// before generation resumes.
pub struct ChatOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    registry: Arc<dyn ToolRegistry>,
}

impl ChatOrchestrator {
    pub fn new(gateway: Arc<dyn ModelGateway>, registry: Arc<dyn ToolRegistry>) -> Self {
        Self { gateway, registry }
    }

    /// Run one chat turn, pushing updates into `updates` as they happen.
    ///
    /// A closed receiver means the caller went away: relaying stops and
    /// the gateway stream is abandoned. Tool side effects already
    /// committed stay committed either way.
    pub async fn run(
        &self,
        messages: &[ChatMessage],
        model: Option<String>,
        updates: mpsc::Sender<ChatUpdate>,
    ) -> Result<(), ChatError> {
        if messages.is_empty() {
            return Err(ChatError::EmptyConversation);
        }
        let mut turns = turns_from_messages(messages);
        if turns.is_empty() {
            return Err(ChatError::EmptyConversation);
        }

        for round in 0..MAX_TOOL_ROUNDS {
            let request = GenerateRequest::new(CHAT_SYSTEM_PROMPT, turns.clone())
                .with_tools(self.registry.declarations())
                .with_model(model.clone());

            let mut stream = match self.gateway.generate(request).await {
                Ok(stream) => stream,
                Err(e) => {
                    let message = e.to_string();
                    let _ = updates.send(ChatUpdate::Error { message }).await;
                    return Err(ChatError::Gateway(e));
                }
            };

            // Content produced in this round, replayed into the context if
            // generation has to resume after tool calls.
            let mut assistant_parts: Vec<ContentPart> = Vec::new();
            let mut tool_results: Vec<ContentPart> = Vec::new();
            let mut terminal: Option<GatewayEvent> = None;

            while let Some(event) = stream.next().await {
                match event {
                    GatewayEvent::TextFragment { text } => {
                        if updates
                            .send(ChatUpdate::Text { text: text.clone() })
                            .await
                            .is_err()
                        {
                            debug!("chat client disconnected, abandoning stream");
                            return Ok(());
                        }
                        match assistant_parts.last_mut() {
                            Some(ContentPart::Text { text: existing }) => existing.push_str(&text),
                            _ => assistant_parts.push(ContentPart::Text { text }),
                        }
                    }
                    GatewayEvent::ToolCall {
                        id,
                        name,
                        arguments,
                    } => {
                        if updates
                            .send(ChatUpdate::ToolCall {
                                id: id.clone(),
                                name: name.clone(),
                                arguments: arguments.clone(),
                            })
                            .await
                            .is_err()
                        {
                            return Ok(());
                        }

                        let outcome = self
                            .registry
                            .dispatch(&name, arguments.clone())
                            .unwrap_or_else(|| {
                                warn!(tool = %name, "model called an undeclared tool");
                                ToolOutcome::failed(ToolFailure::NotFound {
                                    resource: format!("tool '{name}'"),
                                })
                            });
                        let payload = outcome.to_model_payload();

                        if updates
                            .send(ChatUpdate::ToolResult {
                                id: id.clone(),
                                name: name.clone(),
                                output: payload.clone(),
                            })
                            .await
                            .is_err()
                        {
                            return Ok(());
                        }

                        assistant_parts.push(ContentPart::ToolUse {
                            id: id.clone(),
                            name,
                            input: arguments,
                        });
                        tool_results.push(ContentPart::ToolResult {
                            tool_use_id: id,
                            content: payload.to_string(),
                        });
                    }
                    terminal_event => {
                        terminal = Some(terminal_event);
                        break;
                    }
                }
            }

            match terminal {
                Some(GatewayEvent::Done {
                    stop_reason: StopReason::ToolUse,
                }) if !tool_results.is_empty() => {
                    // Resume with the tool results appended to context.
                    turns.push(Turn::assistant(assistant_parts));
                    turns.push(Turn::user(tool_results));
                    debug!(round, "resuming generation after tool round");
                }
                Some(GatewayEvent::Done { .. }) => {
                    let _ = updates.send(ChatUpdate::Completed).await;
                    return Ok(());
                }
                Some(GatewayEvent::Error { message }) => {
                    let _ = updates
                        .send(ChatUpdate::Error {
                            message: message.clone(),
                        })
                        .await;
                    return Err(ChatError::Stream { message });
                }
                _ => {
                    let message = "generation stream ended without a terminal event".to_string();
                    let _ = updates
                        .send(ChatUpdate::Error {
                            message: message.clone(),
                        })
                        .await;
                    return Err(ChatError::Stream { message });
                }
            }
        }

        let error = ChatError::ToolRoundsExceeded {
            limit: MAX_TOOL_ROUNDS,
        };
        let _ = updates
            .send(ChatUpdate::Error {
                message: error.to_string(),
            })
            .await;
        Err(error)
    }
}

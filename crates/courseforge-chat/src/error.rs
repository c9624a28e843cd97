use courseforge_llm::GatewayError;
use thiserror::Error;

/// Failures of the chat workflow.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request carried no conversational messages.
    #[error("conversation must contain at least one message")]
    EmptyConversation,

    /// The gateway failed before any streaming began.
    #[error("model gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The gateway stream terminated with an error event.
    #[error("generation stream failed: {message}")]
    Stream { message: String },

    /// The model kept calling tools past the round limit.
    #[error("tool round limit of {limit} exceeded")]
    ToolRoundsExceeded { limit: usize },
}

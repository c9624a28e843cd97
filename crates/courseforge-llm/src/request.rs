//! Request shapes for a generation call.
//!
//! Turns and content parts serialize directly into the provider's
//! messages wire format (text / tool_use / tool_result blocks).

use courseforge_core::{ChatMessage, Role, ToolDeclaration};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Role of a context turn. System text travels as a separate top-level
/// field, not as a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One content block inside a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
    ToolResult { tool_use_id: String, content: String },
}

/// One turn of model context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: Vec<ContentPart>,
}

impl Turn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    pub fn assistant(content: Vec<ContentPart>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content,
        }
    }

    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: TurnRole::User,
            content,
        }
    }
}

/// Convert caller-supplied history into context turns. System messages are
/// folded into the system prompt by the orchestrator, so they are skipped
/// here.
pub fn turns_from_messages(messages: &[ChatMessage]) -> Vec<Turn> {
    messages
        .iter()
        .filter_map(|msg| match msg.role {
            Role::User => Some(Turn::user_text(msg.content.clone())),
            Role::Assistant => Some(Turn::assistant_text(msg.content.clone())),
            Role::System => None,
        })
        .collect()
}

/// How strongly the model is steered toward tool usage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// Model decides freely.
    #[default]
    Auto,
    /// Model must call some tool.
    Any,
    /// Model must call the named tool.
    Tool(String),
}

impl ToolChoice {
    pub fn to_wire(&self) -> Value {
        match self {
            ToolChoice::Auto => json!({"type": "auto"}),
            ToolChoice::Any => json!({"type": "any"}),
            ToolChoice::Tool(name) => json!({"type": "tool", "name": name}),
        }
    }
}

/// A full generation request as the orchestrator assembles it.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system: String,
    pub turns: Vec<Turn>,
    pub tools: Vec<ToolDeclaration>,
    /// Override of the configured model identifier.
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub tool_choice: ToolChoice,
}

impl GenerateRequest {
    pub fn new(system: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self {
            system: system.into(),
            turns,
            tools: Vec::new(),
            model: None,
            temperature: None,
            max_tokens: None,
            tool_choice: ToolChoice::Auto,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

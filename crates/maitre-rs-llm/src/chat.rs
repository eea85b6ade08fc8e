//! Chat message types and the provider traits used by the workflow.

use crate::error::LlmError;
use async_trait::async_trait;
use maitre_rs_protocol::{ConversationTurn, ModelParams, Role};
use serde::{Deserialize, Serialize};

/// Speaker role in a provider chat request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instruction block for the model.
    System,
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
}

impl ChatRole {
    /// Return the role as its lowercase wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message in a provider chat request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role for the message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        let role = match turn.role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        };
        Self {
            role,
            content: turn.content.clone(),
        }
    }
}

/// Multi-turn chat capability.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run a chat request and return the assistant text.
    async fn chat(&self, messages: &[ChatMessage], params: &ModelParams)
    -> Result<String, LlmError>;
}

/// Single-turn completion capability.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a single-prompt completion and return the model text.
    async fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, LlmError>;
}

/// Combined provider surface required by the ordering workflow.
pub trait LlmProvider: ChatProvider + CompletionProvider {}

impl<T> LlmProvider for T where T: ChatProvider + CompletionProvider {}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRole};
    use maitre_rs_protocol::ConversationTurn;
    use pretty_assertions::assert_eq;

    #[test]
    fn conversation_turns_map_to_chat_messages() {
        let user = ChatMessage::from(&ConversationTurn::user("two burgers"));
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.content, "two burgers");

        let assistant = ChatMessage::from(&ConversationTurn::assistant("added"));
        assert_eq!(assistant.role, ChatRole::Assistant);
        assert_eq!(assistant.content, "added");
    }

    #[test]
    fn chat_roles_serialize_lowercase() {
        let encoded = serde_json::to_string(&ChatMessage::system("rules")).expect("serialize");
        assert_eq!(encoded, r#"{"role":"system","content":"rules"}"#);
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }
}

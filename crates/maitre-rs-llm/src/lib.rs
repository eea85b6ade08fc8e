//! Provider seam for language-model transport: chat message types, the
//! `ChatProvider`/`CompletionProvider` traits, and an OpenAI-compatible
//! Chat Completions client.

mod chat;
mod error;
mod openai;

pub use chat::{ChatMessage, ChatProvider, ChatRole, CompletionProvider, LlmProvider};
pub use error::LlmError;
pub use openai::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, OpenAiClient};

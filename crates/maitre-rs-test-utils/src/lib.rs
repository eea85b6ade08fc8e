//! Test helpers shared across Maitre crates.

pub mod llm;
pub mod menu;

pub use llm::{
    ChatFailingLLM, FailingLLM, FixedLLM, RecordingChatLLM, ScriptedLLM, SlowLLM, verdict_json,
};
pub use menu::sample_menu;

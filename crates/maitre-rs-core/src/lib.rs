//! Core two-stage ordering workflow.
//!
//! This crate owns intent classification, response generation, cart
//! extraction, response sanitization, and the session handling used by
//! SDK callers.

pub mod error;
pub mod extract;
pub mod menu;
pub mod sanitize;
pub mod sessions;
pub mod workflow;

pub use error::MaitreCoreError;
pub use extract::{OrderReply, extract_order_reply, unwrap_reply_object};
pub use menu::load_menu;
/// Menu structure shared with callers.
pub use maitre_rs_protocol::{Menu, MenuItem};
pub use sanitize::{is_degenerate, sanitize_response_text};
pub use sessions::{OrderSession, SessionStore, SessionSummary};
pub use workflow::{Assistant, OrderingWorkflow};

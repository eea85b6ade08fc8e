//! Shared data types for the ordering workflow: turns, carts, verdicts,
//! action records, menus, and model parameters.

mod menu;

pub use menu::{Menu, MenuItem};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Default model name used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Speaker role for a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored turn.
    User,
    /// Assistant-authored turn.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a role from a lowercase string.
    pub fn parse(value: &str) -> Self {
        if value == "assistant" {
            Role::Assistant
        } else {
            Role::User
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(value))
    }
}

/// Single turn stored in a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Role that produced the turn.
    pub role: Role,
    /// Turn content.
    pub content: String,
    /// Timestamp for the turn.
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// Build a turn timestamped now.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Build a user turn timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Build an assistant turn timestamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Intent labels produced by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Menu browsing or item questions.
    Menu,
    /// Cart mutation or checkout requests.
    Order,
    /// Bare greeting with no task content.
    Greeting,
    /// Farewell or conversation closure.
    End,
    /// Off-topic for a restaurant assistant.
    Irrelevant,
    /// Question about the conversation itself.
    History,
}

impl Intent {
    /// Return the intent as its lowercase wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Menu => "menu",
            Intent::Order => "order",
            Intent::Greeting => "greeting",
            Intent::End => "end",
            Intent::Irrelevant => "irrelevant",
            Intent::History => "history",
        }
    }

    /// Parse an intent label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "menu" => Some(Intent::Menu),
            "order" => Some(Intent::Order),
            "greeting" => Some(Intent::Greeting),
            "end" => Some(Intent::End),
            "irrelevant" => Some(Intent::Irrelevant),
            "history" => Some(Intent::History),
            _ => None,
        }
    }
}

/// Classifier output: an intent plus an optional direct response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationVerdict {
    /// Classified intent.
    pub intent: Intent,
    /// Direct response text, empty for intents resolved downstream.
    pub response: String,
}

/// Action kinds attached to finalized records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Greeting answered directly.
    Greeting,
    /// Question about prior turns answered directly.
    HistoryQuery,
    /// Farewell delivered, conversation closed.
    EndConversation,
    /// Off-topic request deflected.
    IrrelevantQuery,
    /// Menu answer pending a detail stage.
    MenuInquiryPending,
    /// Completed menu answer.
    MenuInquiry,
    /// Order action pending a detail stage.
    OrderActionPending,
    /// Completed order action.
    OrderAction,
    /// Failure normalized into a safe reply.
    Error,
}

impl ActionKind {
    /// Return the kind as its snake_case wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Greeting => "greeting",
            ActionKind::HistoryQuery => "history_query",
            ActionKind::EndConversation => "end_conversation",
            ActionKind::IrrelevantQuery => "irrelevant_query",
            ActionKind::MenuInquiryPending => "menu_inquiry_pending",
            ActionKind::MenuInquiry => "menu_inquiry",
            ActionKind::OrderActionPending => "order_action_pending",
            ActionKind::OrderAction => "order_action",
            ActionKind::Error => "error",
        }
    }

    /// Whether this kind expects a follow-up detail stage.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            ActionKind::MenuInquiryPending | ActionKind::OrderActionPending
        )
    }
}

/// One line of an order cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Item name as listed on the menu.
    pub item: String,
    /// Quantity ordered.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Selected options or add-ons.
    #[serde(default)]
    pub options: Vec<String>,
    /// Line price in the restaurant currency.
    #[serde(default)]
    pub price: f64,
}

/// Full cart contents; empty means no active order.
pub type Cart = Vec<CartLine>;

/// Finalized outcome of one workflow stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    /// Displayable response text, always non-empty.
    pub response: String,
    /// Action kind for the record.
    pub kind: ActionKind,
    /// Replacement cart; absent means leave the session cart unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Cart>,
}

impl ActionRecord {
    /// Build a record without a cart.
    pub fn new(kind: ActionKind, response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            kind,
            cart: None,
        }
    }

    /// Build a record carrying a replacement cart.
    pub fn with_cart(kind: ActionKind, response: impl Into<String>, cart: Cart) -> Self {
        Self {
            response: response.into(),
            kind,
            cart: Some(cart),
        }
    }
}

/// Explicit model settings passed into every provider call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelParams {
    /// Model name under the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_quantity() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::{ActionKind, ActionRecord, CartLine, ConversationTurn, Intent, ModelParams, Role};
    use pretty_assertions::assert_eq;

    #[test]
    fn role_parses_and_formats() {
        assert_eq!(Role::parse("assistant"), Role::Assistant);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("anything else"), Role::User);
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn intent_parses_case_insensitively() {
        assert_eq!(Intent::parse("MENU"), Some(Intent::Menu));
        assert_eq!(Intent::parse(" Order "), Some(Intent::Order));
        assert_eq!(Intent::parse("history"), Some(Intent::History));
        assert_eq!(Intent::parse("pizza"), None);
        assert_eq!(Intent::parse(""), None);
    }

    #[test]
    fn action_kind_wire_labels_round_trip() {
        for kind in [
            ActionKind::Greeting,
            ActionKind::HistoryQuery,
            ActionKind::EndConversation,
            ActionKind::IrrelevantQuery,
            ActionKind::MenuInquiryPending,
            ActionKind::MenuInquiry,
            ActionKind::OrderActionPending,
            ActionKind::OrderAction,
            ActionKind::Error,
        ] {
            let encoded = serde_json::to_string(&kind).expect("serialize kind");
            assert_eq!(encoded, format!("\"{}\"", kind.as_str()));
            let decoded: ActionKind = serde_json::from_str(&encoded).expect("deserialize kind");
            assert_eq!(decoded, kind);
        }
    }

    #[test]
    fn pending_kinds_are_flagged() {
        assert!(ActionKind::MenuInquiryPending.is_pending());
        assert!(ActionKind::OrderActionPending.is_pending());
        assert!(!ActionKind::MenuInquiry.is_pending());
        assert!(!ActionKind::Error.is_pending());
    }

    #[test]
    fn cart_line_fills_missing_fields() {
        let line: CartLine =
            serde_json::from_str(r#"{"item": "Classic Burger"}"#).expect("deserialize line");
        assert_eq!(line.item, "Classic Burger");
        assert_eq!(line.quantity, 1);
        assert_eq!(line.options, Vec::<String>::new());
        assert_eq!(line.price, 0.0);
    }

    #[test]
    fn record_without_cart_serializes_compactly() {
        let record = ActionRecord::new(ActionKind::Greeting, "Hello!");
        let encoded = serde_json::to_string(&record).expect("serialize record");
        assert_eq!(encoded, r#"{"response":"Hello!","kind":"greeting"}"#);
    }

    #[test]
    fn turn_constructors_set_roles() {
        assert_eq!(ConversationTurn::user("hi").role, Role::User);
        assert_eq!(ConversationTurn::assistant("hello").role, Role::Assistant);
    }

    #[test]
    fn model_params_default_to_generation_settings() {
        let params = ModelParams::default();
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.timeout_secs, 30);
    }
}

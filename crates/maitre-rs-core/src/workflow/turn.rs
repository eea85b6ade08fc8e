//! The two-stage workflow turning one utterance into finalized records.

use super::classifier::classify;
use super::generators::{generate_farewell, generate_menu_reply, generate_order_reply};
use crate::extract::unwrap_reply_object;
use crate::sanitize::{is_degenerate, sanitize_response_text};
use log::{debug, error, info, warn};
use maitre_rs_config::MaitreConfig;
use maitre_rs_llm::LlmProvider;
use maitre_rs_protocol::{ActionKind, ActionRecord, ConversationTurn, Intent, Menu, ModelParams};
use std::sync::Arc;
use std::time::Duration;

const MENU_ACK: &str = "Give us a moment while we research that for you.";
const ORDER_ACK: &str = "Give us a moment while we get that order ready for you.";
const ORDER_MODIFICATION_ACK: &str =
    "Give us a moment while we get that order modification ready for you.";

const CLASSIFIER_FAILURE_APOLOGY: &str = "I'm sorry, I encountered an error and cannot process \
your request. I can only assist with menu questions and food orders.";
const TIMEOUT_APOLOGY: &str = "I'm sorry, I encountered an error while processing your request. \
Please try again with different wording.";
const STAGE_ONE_APOLOGY: &str =
    "I'm sorry, I didn't generate a proper initial response. Please try again.";
const STAGE_TWO_APOLOGY: &str = "I'm sorry, I didn't receive valid details.";

const MISSING_MENU_QUERY: &str = "Error: Missing query for menu info.";
const MISSING_ORDER_QUERY: &str = "Error: Missing query for order action.";

/// Keywords that mark an order utterance as a modification.
const MODIFICATION_KEYWORDS: [&str; 5] = ["change", "modify", "add", "remove", "update"];

/// Single-use pipeline for one utterance.
///
/// Holds an immutable history snapshot and menu rendering; continuity across
/// utterances comes only from the snapshot the caller passes in. Stage one
/// classifies and either answers directly or acknowledges a pending action;
/// stage two, invoked separately by the caller, resolves a pending action
/// into its detailed reply.
pub struct OrderingWorkflow {
    provider: Arc<dyn LlmProvider>,
    menu_text: String,
    history: Vec<ConversationTurn>,
    classifier_params: ModelParams,
    generation_params: ModelParams,
    timeout: Duration,
}

impl OrderingWorkflow {
    /// Build a workflow for one utterance.
    ///
    /// The history snapshot is capped to the configured window here, so
    /// callers can pass a full transcript.
    pub fn new(
        menu: &Menu,
        mut history: Vec<ConversationTurn>,
        provider: Arc<dyn LlmProvider>,
        config: &MaitreConfig,
    ) -> Self {
        let window = config.workflow.history_window;
        if history.len() > window {
            debug!(
                "capping history snapshot (turns={}, window={})",
                history.len(),
                window
            );
            history.drain(..history.len() - window);
        }
        let workflow = Self {
            provider,
            menu_text: menu.to_prompt_text(),
            history,
            classifier_params: config.classifier.clone(),
            generation_params: config.generation.clone(),
            timeout: Duration::from_secs(config.workflow.timeout_secs),
        };
        debug!(
            "workflow ready (history_turns={}, timeout_secs={})",
            workflow.history.len(),
            config.workflow.timeout_secs
        );
        workflow
    }

    /// Stage one: classify the utterance and produce the first record.
    ///
    /// Terminal intents are answered in full; menu and order intents return
    /// a pending acknowledgment for the caller to display while it invokes
    /// [`run_pending_detail`](Self::run_pending_detail). Never fails: model
    /// errors and timeouts come back as ERROR records.
    pub async fn run_turn(&self, utterance: &str) -> ActionRecord {
        info!("processing utterance (chars={})", utterance.chars().count());
        let record = match tokio::time::timeout(self.timeout, self.classify_stage(utterance)).await
        {
            Ok(record) => record,
            Err(_) => {
                error!(
                    "stage one timed out (timeout_secs={})",
                    self.timeout.as_secs()
                );
                ActionRecord::new(ActionKind::Error, TIMEOUT_APOLOGY)
            }
        };
        finalize(record, STAGE_ONE_APOLOGY)
    }

    /// Stage two: resolve a pending record into its detailed reply.
    ///
    /// `kind` is the stage-one record's kind and `utterance` the original
    /// user text. Calling this with a non-pending kind is a caller bug and
    /// yields an ERROR record.
    pub async fn run_pending_detail(&self, kind: ActionKind, utterance: &str) -> ActionRecord {
        let record =
            match tokio::time::timeout(self.timeout, self.detail_stage(kind, utterance)).await {
                Ok(record) => record,
                Err(_) => {
                    error!(
                        "stage two timed out (kind={}, timeout_secs={})",
                        kind.as_str(),
                        self.timeout.as_secs()
                    );
                    ActionRecord::new(ActionKind::Error, TIMEOUT_APOLOGY)
                }
            };
        finalize(record, STAGE_TWO_APOLOGY)
    }

    async fn classify_stage(&self, utterance: &str) -> ActionRecord {
        let verdict = match classify(
            self.provider.as_ref(),
            utterance,
            &self.history,
            &self.classifier_params,
        )
        .await
        {
            Ok(verdict) => verdict,
            Err(err) => {
                error!("classification failed (error={})", err);
                return ActionRecord::new(ActionKind::Error, CLASSIFIER_FAILURE_APOLOGY);
            }
        };

        match verdict.intent {
            Intent::Menu => ActionRecord::new(ActionKind::MenuInquiryPending, MENU_ACK),
            Intent::Order => ActionRecord::new(
                ActionKind::OrderActionPending,
                order_acknowledgment(utterance),
            ),
            Intent::Greeting => ActionRecord::new(ActionKind::Greeting, verdict.response),
            Intent::History => ActionRecord::new(ActionKind::HistoryQuery, verdict.response),
            Intent::Irrelevant => ActionRecord::new(ActionKind::IrrelevantQuery, verdict.response),
            Intent::End => {
                let farewell = generate_farewell(
                    self.provider.as_ref(),
                    utterance,
                    &self.history,
                    &self.generation_params,
                )
                .await;
                ActionRecord::new(ActionKind::EndConversation, farewell)
            }
        }
    }

    async fn detail_stage(&self, kind: ActionKind, utterance: &str) -> ActionRecord {
        match kind {
            ActionKind::MenuInquiryPending => {
                if utterance.trim().is_empty() {
                    error!("missing query for pending menu inquiry");
                    return ActionRecord::new(ActionKind::Error, MISSING_MENU_QUERY);
                }
                let text = generate_menu_reply(
                    self.provider.as_ref(),
                    utterance,
                    &self.history,
                    &self.menu_text,
                    &self.generation_params,
                )
                .await;
                ActionRecord::new(ActionKind::MenuInquiry, text)
            }
            ActionKind::OrderActionPending => {
                if utterance.trim().is_empty() {
                    error!("missing query for pending order action");
                    return ActionRecord::new(ActionKind::Error, MISSING_ORDER_QUERY);
                }
                let reply = generate_order_reply(
                    self.provider.as_ref(),
                    utterance,
                    &self.history,
                    &self.menu_text,
                    &self.generation_params,
                )
                .await;
                match reply.cart {
                    Some(cart) => {
                        ActionRecord::with_cart(ActionKind::OrderAction, reply.response, cart)
                    }
                    None => ActionRecord::new(ActionKind::OrderAction, reply.response),
                }
            }
            other => {
                error!(
                    "detail stage invoked with non-pending kind (kind={})",
                    other.as_str()
                );
                return ActionRecord::new(ActionKind::Error, STAGE_TWO_APOLOGY);
            }
        }
    }
}

/// Acknowledgment text for a pending order, keyed on modification keywords.
fn order_acknowledgment(utterance: &str) -> &'static str {
    let lowered = utterance.to_lowercase();
    if MODIFICATION_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        ORDER_MODIFICATION_ACK
    } else {
        ORDER_ACK
    }
}

/// Normalize a record's text for display.
///
/// Unwraps a reply that is one whole JSON object, sanitizes, and replaces
/// degenerate output with the stage apology, forcing the kind to ERROR and
/// dropping any cart the degenerate reply carried.
fn finalize(record: ActionRecord, apology: &str) -> ActionRecord {
    let unwrapped = unwrap_reply_object(&record.response);
    let text = sanitize_response_text(unwrapped.as_deref().unwrap_or(&record.response));
    if is_degenerate(&text) {
        warn!(
            "degenerate response replaced (kind={}, raw_len={})",
            record.kind.as_str(),
            record.response.len()
        );
        return ActionRecord::new(ActionKind::Error, apology);
    }
    ActionRecord {
        response: text,
        kind: record.kind,
        cart: record.cart,
    }
}

#[cfg(test)]
mod tests {
    use super::{finalize, order_acknowledgment};
    use maitre_rs_protocol::{ActionKind, ActionRecord, CartLine};
    use pretty_assertions::assert_eq;

    #[test]
    fn modification_keywords_pick_the_modification_ack() {
        assert_eq!(
            order_acknowledgment("remove the fries"),
            "Give us a moment while we get that order modification ready for you."
        );
        assert_eq!(
            order_acknowledgment("I'd like a burger"),
            "Give us a moment while we get that order ready for you."
        );
    }

    #[test]
    fn finalize_sanitizes_and_keeps_the_kind() {
        let record = ActionRecord::new(ActionKind::MenuInquiry, "  Fries   are **great**!  ");
        let finalized = finalize(record, "apology");
        assert_eq!(finalized.kind, ActionKind::MenuInquiry);
        assert_eq!(finalized.response, "Fries are ** great ** !");
    }

    #[test]
    fn finalize_replaces_degenerate_output_and_drops_the_cart() {
        let record = ActionRecord::with_cart(
            ActionKind::OrderAction,
            "{}",
            vec![CartLine {
                item: "Fries".to_string(),
                quantity: 1,
                options: Vec::new(),
                price: 2.99,
            }],
        );
        let finalized = finalize(record, "I'm sorry, I didn't receive valid details.");
        assert_eq!(finalized.kind, ActionKind::Error);
        assert_eq!(finalized.response, "I'm sorry, I didn't receive valid details.");
        assert_eq!(finalized.cart, None);
    }

    #[test]
    fn finalize_unwraps_a_whole_object_reply() {
        let record = ActionRecord::new(
            ActionKind::MenuInquiry,
            "{\"response\": \"Fries are $2.99.\"}",
        );
        let finalized = finalize(record, "apology");
        assert_eq!(finalized.response, "Fries are $2.99.");
        assert_eq!(finalized.kind, ActionKind::MenuInquiry);
    }
}

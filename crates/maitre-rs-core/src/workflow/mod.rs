//! Two-Stage Ordering Workflow

mod classifier;
mod generators;
mod prompt;
mod turn;

pub use turn::OrderingWorkflow;

use crate::error::MaitreCoreError;
use crate::sessions::{SessionStore, SessionSummary};
use log::info;
use maitre_rs_config::MaitreConfig;
use maitre_rs_llm::LlmProvider;
use maitre_rs_protocol::{ActionRecord, Cart, ConversationTurn, Menu, SessionId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Session-facing façade: owns the session store, builds a workflow per
/// utterance, and applies the resulting records back to the session.
pub struct Assistant {
    config: MaitreConfig,
    menu: Menu,
    provider: Arc<dyn LlmProvider>,
    store: SessionStore,
    turn_locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl Assistant {
    /// Build an assistant over a menu, a provider, and configuration.
    pub fn new(menu: Menu, provider: Arc<dyn LlmProvider>, config: MaitreConfig) -> Self {
        info!(
            "initializing assistant (menu_items={}, history_window={})",
            menu.item_count(),
            config.workflow.history_window
        );
        Self {
            config,
            menu,
            provider,
            store: SessionStore::new(),
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new ordering session.
    pub fn create_session(&self) -> SessionId {
        self.store.create_session()
    }

    /// Return the full transcript of a session.
    pub fn history(&self, session_id: SessionId) -> Result<Vec<ConversationTurn>, MaitreCoreError> {
        self.store.history(session_id)
    }

    /// Return the current cart of a session.
    pub fn cart(&self, session_id: SessionId) -> Result<Cart, MaitreCoreError> {
        self.store.cart(session_id)
    }

    /// List summaries for all sessions, newest first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.store.list_sessions()
    }

    /// Delete a session. Returns whether it existed.
    pub fn delete_session(&self, session_id: SessionId) -> bool {
        self.turn_locks.lock().remove(&session_id);
        self.store.delete_session(session_id)
    }

    /// Run one utterance through the two-stage workflow in a session.
    ///
    /// Turns are serialized per session: a second utterance for the same
    /// session waits until the first finished. The history snapshot handed
    /// to the workflow is capped to the configured window and excludes the
    /// current utterance, which the prompts quote separately. Returns the records in display order: one terminal
    /// record, or a pending acknowledgment followed by its detailed reply.
    pub async fn submit(
        &self,
        session_id: SessionId,
        utterance: &str,
    ) -> Result<Vec<ActionRecord>, MaitreCoreError> {
        let lock = self.turn_lock(session_id);
        let _turn = lock.lock().await;

        let window = self.config.workflow.history_window;
        let history = match self.store.recent_history(session_id, window) {
            Ok(history) => history,
            Err(err) => {
                // no lock entry for a session that does not exist
                self.turn_locks.lock().remove(&session_id);
                return Err(err);
            }
        };
        info!(
            "submitting utterance (session_id={}, chars={})",
            session_id,
            utterance.chars().count()
        );
        self.store
            .append_turn(session_id, &ConversationTurn::user(utterance))?;

        let workflow =
            OrderingWorkflow::new(&self.menu, history, self.provider.clone(), &self.config);
        let first = workflow.run_turn(utterance).await;
        self.apply_record(session_id, &first)?;

        let mut records = vec![first];
        if records[0].kind.is_pending() {
            let detail = workflow.run_pending_detail(records[0].kind, utterance).await;
            self.apply_record(session_id, &detail)?;
            records.push(detail);
        }
        Ok(records)
    }

    /// Append a record's text as an assistant turn and adopt its cart.
    ///
    /// A record without a cart leaves the session cart untouched.
    fn apply_record(
        &self,
        session_id: SessionId,
        record: &ActionRecord,
    ) -> Result<(), MaitreCoreError> {
        self.store.append_turn(
            session_id,
            &ConversationTurn::assistant(record.response.as_str()),
        )?;
        if let Some(cart) = &record.cart {
            info!(
                "replacing cart (session_id={}, lines={})",
                session_id,
                cart.len()
            );
            self.store.replace_cart(session_id, cart.clone())?;
        }
        Ok(())
    }

    fn turn_lock(&self, session_id: SessionId) -> Arc<tokio::sync::Mutex<()>> {
        self.turn_locks
            .lock()
            .entry(session_id)
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::Assistant;
    use maitre_rs_config::MaitreConfig;
    use maitre_rs_protocol::{ActionKind, ActionRecord, CartLine, Menu};
    use maitre_rs_test_utils::FixedLLM;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn assistant() -> Assistant {
        Assistant::new(
            Menu::new(),
            Arc::new(FixedLLM::new("ok")),
            MaitreConfig::default(),
        )
    }

    #[test]
    fn apply_record_appends_the_turn_and_keeps_the_cart_untouched() {
        let assistant = assistant();
        let session_id = assistant.create_session();
        let record = ActionRecord::new(ActionKind::Greeting, "Hello!");
        assistant.apply_record(session_id, &record).expect("apply");

        let history = assistant.history(session_id).expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "Hello!");
        assert_eq!(assistant.cart(session_id).expect("cart"), vec![]);
    }

    #[test]
    fn apply_record_replaces_the_cart_when_present() {
        let assistant = assistant();
        let session_id = assistant.create_session();
        let line = CartLine {
            item: "Fries".to_string(),
            quantity: 2,
            options: Vec::new(),
            price: 2.99,
        };
        let record = ActionRecord::with_cart(ActionKind::OrderAction, "Done.", vec![line.clone()]);
        assistant.apply_record(session_id, &record).expect("apply");

        assert_eq!(assistant.cart(session_id).expect("cart"), vec![line]);
    }

    #[test]
    fn delete_session_drops_the_turn_lock_entry() {
        let assistant = assistant();
        let session_id = assistant.create_session();
        let _lock = assistant.turn_lock(session_id);
        assert_eq!(assistant.turn_locks.lock().len(), 1);

        assert_eq!(assistant.delete_session(session_id), true);
        assert_eq!(assistant.turn_locks.lock().len(), 0);
    }
}

//! In-memory session store for ordering conversations.

use crate::error::MaitreCoreError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use maitre_rs_protocol::{Cart, ConversationTurn, SessionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// One ordering conversation: its transcript and the current cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSession {
    /// Unique session id.
    pub id: SessionId,
    /// Append-only transcript, oldest first.
    pub turns: Vec<ConversationTurn>,
    /// Current order; empty means no active order.
    pub cart: Cart,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Lightweight session listing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Unique session id.
    pub id: SessionId,
    /// Number of transcript turns.
    pub turn_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Session storage shared by the assistant facade and direct callers.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, OrderSession>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its id.
    pub fn create_session(&self) -> SessionId {
        let session = OrderSession {
            id: Uuid::new_v4(),
            turns: Vec::new(),
            cart: Cart::new(),
            created_at: Utc::now(),
        };
        info!("created session (session_id={})", session.id);
        let session_id = session.id;
        self.sessions.write().insert(session.id, session);
        session_id
    }

    /// Return a snapshot of one session.
    pub fn session(&self, session_id: SessionId) -> Result<OrderSession, MaitreCoreError> {
        self.sessions
            .read()
            .get(&session_id)
            .cloned()
            .ok_or(MaitreCoreError::UnknownSession(session_id))
    }

    /// List session summaries, newest first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .read()
            .values()
            .map(|session| SessionSummary {
                id: session.id,
                turn_count: session.turns.len(),
                created_at: session.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Delete a session. Returns whether it existed.
    pub fn delete_session(&self, session_id: SessionId) -> bool {
        info!("deleting session (session_id={})", session_id);
        self.sessions.write().remove(&session_id).is_some()
    }

    /// Append a turn to a session transcript.
    pub fn append_turn(
        &self,
        session_id: SessionId,
        turn: &ConversationTurn,
    ) -> Result<(), MaitreCoreError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(MaitreCoreError::UnknownSession(session_id))?;
        debug!(
            "appending turn (session_id={}, role={}, content_len={})",
            session_id,
            turn.role.as_str(),
            turn.content.len()
        );
        session.turns.push(turn.clone());
        Ok(())
    }

    /// Return the full transcript of a session.
    pub fn history(&self, session_id: SessionId) -> Result<Vec<ConversationTurn>, MaitreCoreError> {
        Ok(self.session(session_id)?.turns)
    }

    /// Return the most recent `limit` turns of a session.
    pub fn recent_history(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, MaitreCoreError> {
        let turns = self.history(session_id)?;
        let start = turns.len().saturating_sub(limit);
        Ok(turns[start..].to_vec())
    }

    /// Return the current cart of a session.
    pub fn cart(&self, session_id: SessionId) -> Result<Cart, MaitreCoreError> {
        Ok(self.session(session_id)?.cart)
    }

    /// Replace a session's cart with a new snapshot.
    pub fn replace_cart(&self, session_id: SessionId, cart: Cart) -> Result<(), MaitreCoreError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(MaitreCoreError::UnknownSession(session_id))?;
        debug!(
            "replacing cart (session_id={}, lines={})",
            session_id,
            cart.len()
        );
        session.cart = cart;
        Ok(())
    }
}

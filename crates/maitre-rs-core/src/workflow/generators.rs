//! Detail-stage response generators for menu, order, and farewell replies.
//!
//! Generators are leaf operations: a failed model call degrades that one
//! reply to a canned apology instead of aborting the turn. Raw errors go to
//! the log, never into user-facing text.

use super::prompt::{
    build_farewell_instructions, build_menu_instructions, build_order_instructions,
};
use crate::extract::{OrderReply, extract_order_reply};
use log::{debug, error};
use maitre_rs_llm::{ChatMessage, LlmProvider};
use maitre_rs_protocol::{ConversationTurn, ModelParams};
use std::time::Instant;

const MENU_APOLOGY: &str = "I'm sorry, I had trouble providing menu information. Please try again.";
const ORDER_APOLOGY: &str = "I'm sorry, I had trouble with your order. Please try again.";
const FAREWELL_APOLOGY: &str = "I'm sorry, I had trouble saying goodbye.";

/// Generate the detailed menu reply for an utterance.
pub(crate) async fn generate_menu_reply(
    provider: &dyn LlmProvider,
    utterance: &str,
    history: &[ConversationTurn],
    menu_text: &str,
    params: &ModelParams,
) -> String {
    let messages = build_messages(history, utterance, build_menu_instructions(menu_text));
    debug!("requesting menu details");
    let started = Instant::now();
    match provider.chat(&messages, params).await {
        Ok(text) => {
            debug!(
                "menu details ready (elapsed_ms={})",
                started.elapsed().as_millis()
            );
            text
        }
        Err(err) => {
            error!("menu generation failed (error={})", err);
            MENU_APOLOGY.to_string()
        }
    }
}

/// Generate the detailed order reply, splitting out any embedded cart.
pub(crate) async fn generate_order_reply(
    provider: &dyn LlmProvider,
    utterance: &str,
    history: &[ConversationTurn],
    menu_text: &str,
    params: &ModelParams,
) -> OrderReply {
    let messages = build_messages(history, utterance, build_order_instructions(menu_text));
    debug!("requesting order details");
    let started = Instant::now();
    match provider.chat(&messages, params).await {
        Ok(text) => {
            let reply = extract_order_reply(&text);
            debug!(
                "order details ready (elapsed_ms={}, cart_present={})",
                started.elapsed().as_millis(),
                reply.cart.is_some()
            );
            reply
        }
        Err(err) => {
            error!("order generation failed (error={})", err);
            OrderReply {
                response: ORDER_APOLOGY.to_string(),
                cart: None,
            }
        }
    }
}

/// Generate the farewell reply.
pub(crate) async fn generate_farewell(
    provider: &dyn LlmProvider,
    utterance: &str,
    history: &[ConversationTurn],
    params: &ModelParams,
) -> String {
    let messages = build_messages(history, utterance, build_farewell_instructions());
    debug!("requesting farewell");
    let started = Instant::now();
    match provider.chat(&messages, params).await {
        Ok(text) => {
            debug!(
                "farewell ready (elapsed_ms={})",
                started.elapsed().as_millis()
            );
            text
        }
        Err(err) => {
            error!("farewell generation failed (error={})", err);
            FAREWELL_APOLOGY.to_string()
        }
    }
}

/// Assemble a generation transcript: history turns, the utterance as a user
/// message, then the handler instructions as a trailing system message.
fn build_messages(
    history: &[ConversationTurn],
    utterance: &str,
    instructions: String,
) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
    messages.push(ChatMessage::user(utterance));
    messages.push(ChatMessage::system(instructions));
    messages
}

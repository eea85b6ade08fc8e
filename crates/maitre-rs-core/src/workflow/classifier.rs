//! Intent classification via the router prompt, with layered fallback repair.

use super::prompt::build_router_prompt;
use log::{debug, info, warn};
use maitre_rs_llm::{LlmError, LlmProvider};
use maitre_rs_protocol::{ClassificationVerdict, ConversationTurn, Intent, ModelParams};
use serde_json::Value;
use std::time::Instant;

/// Fallback used when the router names an unusable greeting response.
const GREETING_FALLBACK: &str = "Hello! How can I help with the menu or your order?";
const HISTORY_FALLBACK: &str = "I can see you're asking about our previous conversation. \
How can I help you with our menu or placing an order?";
const IRRELEVANT_FALLBACK: &str =
    "I'm sorry, I can only assist with questions about our menu and help you place an order.";
const INVALID_INTENT_APOLOGY: &str =
    "I'm sorry, I encountered an issue. I can only assist with menu questions and food orders.";
const NOT_AN_OBJECT_APOLOGY: &str = "I'm sorry, I encountered an issue processing the response. \
I can only assist with menu questions and food orders.";
const UNPARSEABLE_APOLOGY: &str = "I'm sorry, I had trouble understanding that. \
I can only assist with menu questions and food orders.";
const KEYWORD_GREETING: &str = "Hello! How can I help you with the menu or your order today?";

/// JSON punctuation the router sometimes emits instead of a sentence.
const RESPONSE_FRAGMENTS: [&str; 11] =
    ["{", "}", "[]", "[", "]", "{}", ":", "\"\"", "''", ",", "."];

/// Classify one utterance against the transcript.
///
/// Sends the router prompt as a single-turn completion, then repairs the
/// reply into a usable verdict. Model-call failures propagate to the
/// orchestrator, which owns the error record for stage one.
pub(crate) async fn classify(
    provider: &dyn LlmProvider,
    utterance: &str,
    history: &[ConversationTurn],
    params: &ModelParams,
) -> Result<ClassificationVerdict, LlmError> {
    let prompt = build_router_prompt(utterance, history);
    debug!("sending intent classification request");
    let started = Instant::now();
    let raw = provider.complete(&prompt, params).await?;
    let elapsed_ms = started.elapsed().as_millis();
    let raw = raw.trim();
    debug!("router response (elapsed_ms={}): {}", elapsed_ms, raw);

    let verdict = parse_verdict(raw);
    info!(
        "classified intent (intent={}, elapsed_ms={})",
        verdict.intent.as_str(),
        elapsed_ms
    );
    Ok(verdict)
}

/// Repair a raw router reply into a verdict. Never fails.
pub(crate) fn parse_verdict(raw: &str) -> ClassificationVerdict {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return keyword_fallback(raw);
    };
    let Some(object) = value.as_object() else {
        warn!("router reply parsed but is not an object, defaulting to irrelevant");
        return ClassificationVerdict {
            intent: Intent::Irrelevant,
            response: NOT_AN_OBJECT_APOLOGY.to_string(),
        };
    };

    let mut response = match object.get("response") {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    };
    let intent = match object
        .get("intent")
        .and_then(Value::as_str)
        .and_then(Intent::parse)
    {
        Some(intent) => intent,
        None => {
            warn!("invalid or missing intent in router reply, defaulting to irrelevant");
            if response.trim().is_empty() {
                response = INVALID_INTENT_APOLOGY.to_string();
            }
            Intent::Irrelevant
        }
    };

    if matches!(
        intent,
        Intent::Greeting | Intent::History | Intent::Irrelevant
    ) {
        let trimmed = response.trim();
        if trimmed.is_empty() || RESPONSE_FRAGMENTS.contains(&trimmed) {
            warn!(
                "unusable router response, using fallback (intent={})",
                intent.as_str()
            );
            response = match intent {
                Intent::Greeting => GREETING_FALLBACK,
                Intent::History => HISTORY_FALLBACK,
                _ => IRRELEVANT_FALLBACK,
            }
            .to_string();
        }
    }

    ClassificationVerdict { intent, response }
}

/// Keyword scan applied when the router reply is not valid JSON.
fn keyword_fallback(raw: &str) -> ClassificationVerdict {
    warn!("router reply is not valid JSON, scanning for keywords");
    let lowered = raw.to_lowercase();

    let (intent, response) = if lowered.contains("menu") {
        (Intent::Menu, String::new())
    } else if ["order", "cart", "checkout"]
        .iter()
        .any(|kw| lowered.contains(kw))
    {
        (Intent::Order, String::new())
    } else if ["hello", "hi ", " how are"]
        .iter()
        .any(|kw| lowered.contains(kw))
    {
        (Intent::Greeting, KEYWORD_GREETING.to_string())
    } else if ["bye", "thank you", "thanks"]
        .iter()
        .any(|kw| lowered.contains(kw))
    {
        (Intent::End, String::new())
    } else {
        (Intent::Irrelevant, UNPARSEABLE_APOLOGY.to_string())
    };

    debug!("keyword fallback verdict (intent={})", intent.as_str());
    ClassificationVerdict { intent, response }
}

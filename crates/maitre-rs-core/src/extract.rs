//! Extraction of structured order data embedded in free-form model replies.

use log::warn;
use maitre_rs_protocol::{Cart, CartLine};
use serde_json::Value;

/// Conversational text plus the cart snapshot found alongside it, if any.
///
/// `cart: None` means the reply carried no cart array and the session cart
/// must be left unchanged. `Some(vec![])` is a real state: the model emptied
/// the order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReply {
    /// Display text for the caller.
    pub response: String,
    /// Full replacement cart, when the reply carried one.
    pub cart: Option<Cart>,
}

/// Split a model reply into conversational text and an embedded cart.
///
/// Scans `raw` for brace-balanced substrings (one nesting level deep),
/// parses each in order of appearance, and accepts the first JSON object
/// with a `"response"` key. The `"cart"` key is adopted only when it is an
/// array. When no candidate qualifies the raw text is returned unchanged.
/// Malformed input is never an error, only a skipped candidate.
pub fn extract_order_reply(raw: &str) -> OrderReply {
    for candidate in scan_json_candidates(raw) {
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        let Some(object) = value.as_object() else {
            continue;
        };
        let Some(response) = object.get("response") else {
            continue;
        };
        let cart = object
            .get("cart")
            .and_then(Value::as_array)
            .map(|lines| parse_cart_lines(lines));
        return OrderReply {
            response: coerce_text(response),
            cart,
        };
    }
    OrderReply {
        response: raw.to_string(),
        cart: None,
    }
}

/// Unwrap a reply that is itself one whole JSON object.
///
/// Returns the `"response"` string when the entire trimmed reply parses as
/// a single object carrying one, `None` otherwise. Applied before display
/// to catch replies where the model leaked its output envelope.
pub fn unwrap_reply_object(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return None;
    }
    let value = serde_json::from_str::<Value>(trimmed).ok()?;
    value
        .as_object()?
        .get("response")?
        .as_str()
        .map(str::to_string)
}

/// Collect brace-balanced candidate substrings, leftmost and non-overlapping.
///
/// A candidate is `{` followed by non-brace text or complete single-level
/// `{...}` groups, closed by `}`. Deeper nesting makes the outer candidate
/// fail, so scanning resumes one byte later and finds the inner object.
fn scan_json_candidates(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        match candidate_end(bytes, i) {
            Some(end) => {
                candidates.push(&text[i..end]);
                i = end;
            }
            None => i += 1,
        }
    }
    candidates
}

/// End offset (exclusive) of the candidate opening at `start`, if it closes.
fn candidate_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'}' => return Some(i + 1),
            b'{' => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != b'{' && bytes[j] != b'}' {
                    j += 1;
                }
                if j < bytes.len() && bytes[j] == b'}' {
                    i = j + 1;
                } else {
                    return None;
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// Parse cart lines leniently, dropping lines the model malformed.
fn parse_cart_lines(lines: &[Value]) -> Cart {
    let mut cart = Cart::new();
    for line in lines {
        match serde_json::from_value::<CartLine>(line.clone()) {
            Ok(parsed) => cart.push(parsed),
            Err(err) => warn!("skipping malformed cart line (error={})", err),
        }
    }
    cart
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_order_reply, scan_json_candidates, unwrap_reply_object};
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_response_and_cart_from_surrounding_prose() {
        let raw = concat!(
            "Sure! {\"response\": \"Added.\", \"cart\": ",
            "[{\"item\":\"Burger\",\"quantity\":1,\"options\":[],\"price\":8.5}]}",
        );
        let reply = extract_order_reply(raw);
        assert_eq!(reply.response, "Added.");
        let cart = reply.cart.expect("cart");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item, "Burger");
        assert_eq!(cart[0].price, 8.5);
    }

    #[test]
    fn plain_prose_passes_through_without_a_cart() {
        let reply = extract_order_reply("No JSON here, just words.");
        assert_eq!(reply.response, "No JSON here, just words.");
        assert_eq!(reply.cart, None);
    }

    #[test]
    fn malformed_json_inside_braces_falls_back_to_raw_text() {
        let raw = "{not json at all";
        let reply = extract_order_reply(raw);
        assert_eq!(reply.response, raw);
        assert_eq!(reply.cart, None);
    }

    #[test]
    fn skips_invalid_candidates_until_one_qualifies() {
        let raw = "{broken {\"response\": \"ok\", \"cart\": []}";
        let reply = extract_order_reply(raw);
        assert_eq!(reply.response, "ok");
        assert_eq!(reply.cart, Some(Vec::new()));
    }

    #[test]
    fn object_without_response_key_is_not_accepted() {
        let reply = extract_order_reply("{\"cart\": []} trailing");
        assert_eq!(reply.response, "{\"cart\": []} trailing");
        assert_eq!(reply.cart, None);
    }

    #[test]
    fn non_array_cart_leaves_the_cart_absent() {
        let reply = extract_order_reply("{\"response\": \"hi\", \"cart\": \"oops\"}");
        assert_eq!(reply.response, "hi");
        assert_eq!(reply.cart, None);
    }

    #[test]
    fn empty_cart_array_is_an_explicit_empty_cart() {
        let reply = extract_order_reply("{\"response\": \"Cart cleared.\", \"cart\": []}");
        assert_eq!(reply.cart, Some(Vec::new()));
    }

    #[test]
    fn malformed_cart_lines_are_dropped_not_fatal() {
        let raw = concat!(
            "{\"response\": \"ok\", \"cart\": ",
            "[{\"item\":\"Fries\"}, \"garbage\", {\"quantity\": 2}]}",
        );
        let reply = extract_order_reply(raw);
        let cart = reply.cart.expect("cart");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item, "Fries");
        assert_eq!(cart[0].quantity, 1);
        assert_eq!(cart[0].price, 0.0);
    }

    #[test]
    fn null_response_coerces_to_empty_text() {
        let reply = extract_order_reply("{\"response\": null}");
        assert_eq!(reply.response, "");
    }

    #[test]
    fn scanner_supports_one_nesting_level() {
        let candidates = scan_json_candidates("pre {\"a\": {\"b\": 1}, \"c\": 2} post");
        assert_eq!(candidates, vec!["{\"a\": {\"b\": 1}, \"c\": 2}"]);
    }

    #[test]
    fn scanner_skips_to_the_inner_object_on_deeper_nesting() {
        assert_eq!(scan_json_candidates("{a{b{c}d}e}"), vec!["{b{c}d}"]);
    }

    #[test]
    fn scanner_finds_successive_objects() {
        let candidates = scan_json_candidates("{\"a\":1}{\"b\":2}");
        assert_eq!(candidates, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn unwraps_a_whole_object_reply() {
        assert_eq!(
            unwrap_reply_object("  {\"response\": \"Here you go.\"}  "),
            Some("Here you go.".to_string())
        );
    }

    #[test]
    fn unwrap_ignores_prose_and_non_string_responses() {
        assert_eq!(unwrap_reply_object("plain text"), None);
        assert_eq!(unwrap_reply_object("{\"response\": 7}"), None);
        assert_eq!(unwrap_reply_object("{\"other\": \"x\"}"), None);
    }
}

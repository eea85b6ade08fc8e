//! Display-text cleanup applied to every model reply before it reaches a caller.

use regex::Regex;

/// Characters removed from model output before display.
const DISALLOWED_PATTERN: &str = r"[^a-zA-Z0-9\s.,!?$:()\-+*/\\]";

/// Fragments a reply can collapse to when the model leaks JSON punctuation.
const DEGENERATE_FRAGMENTS: [&str; 6] = ["{", "}", "[]", "[", "]", "{}"];

/// Normalize model output for display.
///
/// Strips characters outside the display allow-list, collapses whitespace
/// runs to single spaces, pads literal `**` markers so they render as
/// standalone tokens, and trims. Idempotent: applying it twice yields the
/// same string.
pub fn sanitize_response_text(text: &str) -> String {
    let stripped = match Regex::new(DISALLOWED_PATTERN) {
        Ok(regex) => regex.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    };
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let spaced = space_after_bold(&space_before_bold(&collapsed));
    spaced.trim().to_string()
}

/// True when sanitized text is empty or a bare punctuation fragment.
pub fn is_degenerate(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || DEGENERATE_FRAGMENTS.contains(&trimmed)
}

/// Insert a space before each `**` marker not already preceded by whitespace.
fn space_before_bold(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let marker = chars[i] == '*' && i + 1 < chars.len() && chars[i + 1] == '*';
        if marker && (i == 0 || !chars[i - 1].is_whitespace()) {
            out.push(' ');
            out.push_str("**");
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Insert a space after each `**` marker not already followed by whitespace.
fn space_after_bold(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let marker = chars[i] == '*' && i + 1 < chars.len() && chars[i + 1] == '*';
        if marker && (i + 2 == chars.len() || !chars[i + 2].is_whitespace()) {
            out.push_str("** ");
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{is_degenerate, sanitize_response_text};
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_characters_outside_the_allow_list() {
        assert_eq!(
            sanitize_response_text("h\u{e9}llo @world# <b>50% off</b>"),
            "hllo world b50 off/b"
        );
    }

    #[test]
    fn keeps_allowed_punctuation() {
        let text = "Total: $12.50 (2 x $6.25) - ok!";
        assert_eq!(sanitize_response_text(text), text);
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(sanitize_response_text("a \t b\n\n c"), "a b c");
    }

    #[test]
    fn stripping_never_leaves_doubled_spaces() {
        assert_eq!(sanitize_response_text("left @ right"), "left right");
    }

    #[test]
    fn pads_bold_markers() {
        assert_eq!(
            sanitize_response_text("Try the**Classic Burger**today"),
            "Try the ** Classic Burger ** today"
        );
    }

    #[test]
    fn leaves_padded_bold_markers_alone() {
        let text = "The ** Classic Burger ** is great";
        assert_eq!(sanitize_response_text(text), text);
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "  H\u{e9}llo **world**!!  ",
            "a @ b",
            "**bold**",
            "****",
            "plain text",
            "\u{7}\u{8}\u{1b}",
        ];
        for input in inputs {
            let once = sanitize_response_text(input);
            assert_eq!(sanitize_response_text(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn pure_control_character_input_sanitizes_to_empty() {
        assert_eq!(sanitize_response_text("\u{7}\u{8}\u{1b}"), "");
        assert_eq!(sanitize_response_text("\u{0}\u{1f}\u{7f}"), "");
    }

    #[test]
    fn degenerate_fragments_are_detected() {
        for fragment in ["{", "}", "[]", "[", "]", "{}", "", "   "] {
            assert!(is_degenerate(fragment), "fragment: {fragment:?}");
        }
        assert!(!is_degenerate("Hello!"));
        assert!(!is_degenerate("{} extra"));
    }
}

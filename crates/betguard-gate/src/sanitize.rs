//! Input hygiene for strings that travel between the UI and the gate.

use betguard_types::{DenialReason, Identity, Result, constants::MARKUP_CHARS};
use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest in a fingerprint.
const FINGERPRINT_HEX_LEN: usize = 16;

/// Drop `< > " '` from free-form input.
#[must_use]
pub fn strip_markup(input: &str) -> String {
    input.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}

/// Escape text for insertion into HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Short stable key for a network-level source (IP, device id). Lets a
/// caller rate-limit by source without storing the raw value.
#[must_use]
pub fn fingerprint(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    format!("fp:{}", hex::encode(&digest[..FINGERPRINT_HEX_LEN / 2]))
}

/// The player-facing denial message, safe to drop into HTML.
#[must_use]
pub fn denial_message_html(reason: &DenialReason) -> String {
    escape_html(&reason.user_message())
}

/// [`fingerprint`] wrapped as an [`Identity`] usable as a rate-limit key.
pub fn fingerprint_identity(source: &str) -> Result<Identity> {
    Identity::new(fingerprint(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_markup_removes_quotes_and_angles() {
        assert_eq!(strip_markup(r#"<b>"hi" 'there'</b>"#), "bhi there/b");
        assert_eq!(strip_markup("0xabc"), "0xabc");
    }

    #[test]
    fn escape_html_covers_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn denial_message_html_is_escaped() {
        let html = denial_message_html(&DenialReason::RateLimited);
        assert_eq!(
            html,
            "Too many bets. Please wait a moment before trying again."
        );
        assert!(!denial_message_html(&DenialReason::BotSuspected).contains('<'));
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = fingerprint("203.0.113.7");
        assert_eq!(a, fingerprint("203.0.113.7"));
        assert_ne!(a, fingerprint("203.0.113.8"));
        assert_eq!(a.len(), 3 + FINGERPRINT_HEX_LEN);
        assert!(a.starts_with("fp:"));
    }

    #[test]
    fn fingerprint_identity_is_valid() {
        let id = fingerprint_identity("198.51.100.1").unwrap();
        assert!(id.as_str().starts_with("fp:"));
    }
}

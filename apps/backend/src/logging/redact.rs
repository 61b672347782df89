//! Redaction of secrets in log text.
//!
//! Session tokens are bearer credentials: anything that can read a log line
//! containing one can replay the session. Text leaving the process (the
//! Slack forwarder) and ids written to structured logs go through here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub const REDACTED_TOKEN: &str = "[REDACTED_TOKEN]";

/// Compact JWS: three base64url segments separated by dots.
fn jws_pattern() -> &'static Regex {
    static JWS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\beyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
    });
    &JWS_REGEX
}

/// Hex runs of 16+ chars, which covers session ids.
fn hex_pattern() -> &'static Regex {
    static HEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Fa-f0-9]{16,}\b").unwrap()
    });
    &HEX_REGEX
}

/// Email addresses keep their first character and domain.
fn email_pattern() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
    });
    &EMAIL_REGEX
}

pub fn redact(input: &str) -> String {
    let tokens = jws_pattern().replace_all(input, REDACTED_TOKEN);
    let ids = hex_pattern().replace_all(&tokens, REDACTED_TOKEN);

    email_pattern()
        .replace_all(&ids, |caps: &regex::Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) if !local.is_empty() => {
                    format!("{}***@{domain}", &local[..1])
                }
                _ => full.to_string(),
            }
        })
        .into_owned()
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

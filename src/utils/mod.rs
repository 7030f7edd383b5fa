pub mod errors;
pub mod logger;
pub mod text;

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

pub use logger::setup_logging;

fn redaction_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{6,}:[A-Za-z0-9_-]{28,}\b").expect("valid redaction pattern"))
}

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{6,}:[A-Za-z0-9_-]+$").expect("valid token pattern"))
}

/// Replace anything that looks like a bot token with `<token>`.
///
/// Applied to every URL and transport error the library logs, and by the
/// log-file writer as a backstop.
pub fn redact_token(text: &str) -> String {
    redaction_pattern().replace_all(text, "<token>").into_owned()
}

pub fn is_valid_token(token: &str) -> bool {
    token_pattern().is_match(token)
}

/// Extract the update category: the single key of the update object that is
/// not `update_id`. Purely structural, no schema lookup.
pub fn update_category(update: &Value) -> Option<&str> {
    update
        .as_object()?
        .keys()
        .map(String::as_str)
        .find(|k| *k != "update_id")
}

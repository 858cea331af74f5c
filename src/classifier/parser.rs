//! Turns raw model output into a relevance verdict.
//!
//! The model is asked for `{"is_relevant": <bool>}` but routinely wraps it in
//! a Markdown code fence or gets cut off by the output token cap. Parsing is
//! two-stage: strict JSON first, then a regex scan for the field when the
//! JSON is beyond repair. Every input yields a verdict.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*").expect("valid fence regex"));

static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("valid fence regex"));

static VERDICT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"is_relevant"\s*:\s*(true|false)"#).expect("valid verdict regex")
});

const FIELD: &str = "is_relevant";

/// Extracts the `is_relevant` verdict from `raw`, defaulting to `false`.
pub fn parse_verdict(raw: &str) -> bool {
    let mut text = clean(raw);
    if !text.ends_with('}') {
        text.push('}');
    }

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => value
            .get(FIELD)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
        Err(e) => {
            let preview: String = text.chars().take(100).collect();
            warn!(%preview, error = %e, "invalid JSON from model, scanning for verdict");
            scan_verdict(&text).unwrap_or(false)
        }
    }
}

fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let unfenced = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE.replace(&unfenced, "").into_owned()
}

fn scan_verdict(text: &str) -> Option<bool> {
    VERDICT_FIELD
        .captures(text)
        .map(|caps| caps[1].eq_ignore_ascii_case("true"))
}

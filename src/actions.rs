use std::sync::LazyLock;

use regex::Regex;

use crate::models::ChatAction;

/// Plain substring match, so "sos" inside a longer word also counts.
pub const SOS_KEYWORDS: &[&str] = &["sos", "emergency"];

/// Whole-phrase match, so "apologize" does not trigger "log".
pub const LOG_VITALS_PHRASES: &[&str] = &["log vitals", "track metrics", "record vitals"];

pub const SOS_LABEL: &str = "Emergency SOS";
pub const SOS_ACTION: &str = "trigger_sos";
pub const LOG_VITALS_LABEL: &str = "Log Vitals";
pub const LOG_VITALS_ACTION: &str = "log_vitals";

static LOG_VITALS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = LOG_VITALS_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("valid log vitals regex")
});

pub fn mentions_emergency(lowered: &str) -> bool {
    SOS_KEYWORDS.iter().any(|k| lowered.contains(k))
}

pub fn mentions_log_vitals(lowered: &str) -> bool {
    LOG_VITALS_PATTERN.is_match(lowered)
}

/// Suggested UI actions for a generated reply, SOS first. `None` when nothing
/// matched.
pub fn infer_actions(text: &str) -> Option<Vec<ChatAction>> {
    let lowered = text.to_lowercase();
    let mut actions = Vec::new();

    if mentions_emergency(&lowered) {
        actions.push(ChatAction::new(SOS_LABEL, SOS_ACTION));
    }
    if mentions_log_vitals(&lowered) {
        actions.push(ChatAction::new(LOG_VITALS_LABEL, LOG_VITALS_ACTION));
    }

    if actions.is_empty() {
        None
    } else {
        tracing::debug!(count = actions.len(), "Inferred chat actions");
        Some(actions)
    }
}

//! Navigation of the generateContent envelope.
//!
//! The provider reports "no text" in several ways; [`extract`] folds them into
//! one discriminated result so the precedence is decided in exactly one place:
//! text, then block reason, then finish reason, then nothing.

use crate::error::{AssistantError, CallPath, Result};
use crate::models::GenerateContentResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Success(String),
    Blocked(String),
    Stopped(String),
    Empty,
}

pub fn extract(resp: &GenerateContentResponse) -> Extraction {
    let first = resp.candidates.as_ref().and_then(|c| c.first());

    let text = first
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.as_deref())
        .filter(|text| !text.is_empty());
    if let Some(text) = text {
        return Extraction::Success(text.to_string());
    }

    let block_reason = resp
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
        .filter(|r| !r.is_empty());
    let finish_reason = first
        .and_then(|c| c.finish_reason.as_deref())
        .filter(|r| !r.is_empty());

    tracing::error!(
        finish_reason = ?finish_reason,
        block_reason = ?block_reason,
        safety_ratings = first
            .and_then(|c| c.safety_ratings.as_ref())
            .map_or(0, Vec::len),
        "Gemini returned no content"
    );

    if let Some(reason) = block_reason {
        return Extraction::Blocked(reason.to_string());
    }
    if let Some(reason) = finish_reason {
        return Extraction::Stopped(reason.to_string());
    }
    Extraction::Empty
}

impl Extraction {
    /// Generated text, or the path-worded failure explaining its absence.
    pub fn into_text(self, path: CallPath) -> Result<String> {
        match self {
            Extraction::Success(text) => Ok(text),
            Extraction::Blocked(reason) => Err(AssistantError::ContentBlocked { path, reason }),
            Extraction::Stopped(reason) => {
                Err(AssistantError::GenerationStopped { path, reason })
            }
            Extraction::Empty => Err(AssistantError::EmptyResponse { path }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).expect("test envelope should deserialize")
    }

    #[test]
    fn test_text_wins_over_everything() {
        let resp = envelope(
            r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]},"finishReason":"STOP"}],
                "promptFeedback":{"blockReason":"SAFETY"}}"#,
        );
        assert_eq!(extract(&resp), Extraction::Success("ok".to_string()));
    }

    #[test]
    fn test_block_reason_before_finish_reason() {
        let resp = envelope(
            r#"{"candidates":[{"finishReason":"SAFETY"}],"promptFeedback":{"blockReason":"OTHER"}}"#,
        );
        assert_eq!(extract(&resp), Extraction::Blocked("OTHER".to_string()));
    }

    #[test]
    fn test_finish_reason_when_not_blocked() {
        let resp = envelope(r#"{"candidates":[{"content":{"parts":[{"text":""}]},"finishReason":"MAX_TOKENS"}]}"#);
        assert_eq!(extract(&resp), Extraction::Stopped("MAX_TOKENS".to_string()));
    }

    #[test]
    fn test_empty_when_nothing_explains_it() {
        assert_eq!(extract(&envelope("{}")), Extraction::Empty);
        assert_eq!(extract(&envelope(r#"{"candidates":[]}"#)), Extraction::Empty);
        assert_eq!(
            extract(&envelope(r#"{"candidates":[{"content":{"parts":[]}}]}"#)),
            Extraction::Empty
        );
    }

    #[test]
    fn test_into_text_uses_path_wording() {
        let err = Extraction::Blocked("SAFETY".to_string())
            .into_text(CallPath::Diagnosis)
            .expect_err("blocked should fail");
        assert_eq!(err.to_string(), "Diagnosis blocked: SAFETY");

        let err = Extraction::Stopped("RECITATION".to_string())
            .into_text(CallPath::Chat)
            .expect_err("stopped should fail");
        assert_eq!(err.to_string(), "AI generation stopped: RECITATION");

        let err = Extraction::Empty
            .into_text(CallPath::Diagnosis)
            .expect_err("empty should fail");
        assert!(matches!(err, AssistantError::EmptyResponse { .. }));
    }
}

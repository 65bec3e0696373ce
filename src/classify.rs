use crate::error::AssistantError;
use crate::models::{ChatMessage, DiagnosisResult, Severity};

/// Case-insensitive substrings that mark a failure as quota/rate exhaustion.
pub const RATE_LIMIT_SIGNATURES: &[&str] = &["429", "quota", "too many requests"];

pub const RATE_LIMIT_DIAGNOSIS: &str = "AI Analysis Temporarily Unavailable (Rate Limit)";
pub const RATE_LIMIT_RECOMMENDATIONS: [&str; 3] = [
    "We are receiving too many requests.",
    "Please wait a moment and try again.",
    "Consult a doctor if symptoms persist.",
];
pub const FAILURE_RECOMMENDATIONS: [&str; 3] = [
    "Please check your internet connection.",
    "Verify your API Key configuration.",
    "Try again later.",
];
pub const RATE_LIMIT_CHAT: &str = "I'm currently receiving too many requests. Please try again in a few moments. (Using cached/mock data for now)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    /// Transient quota exhaustion, reported softly.
    RateLimited,
    /// Anything else; carries the message echoed to the user.
    Failed(String),
}

pub fn is_rate_limited(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RATE_LIMIT_SIGNATURES.iter().any(|sig| lowered.contains(sig))
}

pub fn classify(err: &AssistantError) -> FailureClass {
    let mut message = err.to_string();
    if is_rate_limited(&message) {
        return FailureClass::RateLimited;
    }
    if message.is_empty() {
        message = "Unknown Error".to_string();
    }
    FailureClass::Failed(message)
}

pub fn diagnosis_fallback(err: &AssistantError) -> DiagnosisResult {
    match classify(err) {
        FailureClass::RateLimited => {
            tracing::warn!("Diagnosis rate limited: {}", err);
            DiagnosisResult {
                diagnosis: RATE_LIMIT_DIAGNOSIS.to_string(),
                recommendations: owned_lines(&RATE_LIMIT_RECOMMENDATIONS),
                severity: Severity::Medium,
            }
        }
        FailureClass::Failed(message) => {
            tracing::error!("Diagnosis failed: {}", message);
            DiagnosisResult {
                diagnosis: format!("Analysis Failed: {message}"),
                recommendations: owned_lines(&FAILURE_RECOMMENDATIONS),
                severity: Severity::High,
            }
        }
    }
}

pub fn chat_fallback(err: &AssistantError) -> ChatMessage {
    if matches!(err, AssistantError::ConfigurationMissing) {
        tracing::warn!("Chat requested without an API key");
        return ChatMessage::ai(err.to_string());
    }
    match classify(err) {
        FailureClass::RateLimited => {
            tracing::warn!("Chat rate limited: {}", err);
            ChatMessage::ai(RATE_LIMIT_CHAT)
        }
        FailureClass::Failed(message) => {
            tracing::error!("Chat failed: {}", message);
            ChatMessage::ai(format!(
                "Connection Error: {message}. Please check your internet or API key."
            ))
        }
    }
}

fn owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallPath;
    use crate::models::Sender;

    fn api(status: u16, message: Option<&str>) -> AssistantError {
        AssistantError::Api {
            status,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_rate_limit_signatures_any_case_anywhere() {
        assert!(is_rate_limited("API Error: 429"));
        assert!(is_rate_limited("Resource exhausted: QUOTA exceeded"));
        assert!(is_rate_limited("upstream said Too Many Requests, slow down"));
        assert!(!is_rate_limited("API Error: 500"));
        assert!(!is_rate_limited(""));
    }

    #[test]
    fn test_status_only_error_classifies_by_message() {
        assert_eq!(classify(&api(429, None)), FailureClass::RateLimited);
        assert_eq!(
            classify(&api(500, None)),
            FailureClass::Failed("API Error: 500".to_string())
        );
    }

    #[test]
    fn test_diagnosis_rate_limit_fallback() {
        let result = diagnosis_fallback(&api(429, Some("Resource exhausted: quota")));
        assert_eq!(result.diagnosis, RATE_LIMIT_DIAGNOSIS);
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn test_diagnosis_generic_fallback_echoes_message() {
        let err = AssistantError::ContentBlocked {
            path: CallPath::Diagnosis,
            reason: "SAFETY".to_string(),
        };
        let result = diagnosis_fallback(&err);
        assert_eq!(result.diagnosis, "Analysis Failed: Diagnosis blocked: SAFETY");
        assert_eq!(result.recommendations, owned_lines(&FAILURE_RECOMMENDATIONS));
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_chat_fallbacks() {
        let msg = chat_fallback(&api(429, Some("Too many requests")));
        assert_eq!(msg.text, RATE_LIMIT_CHAT);
        assert_eq!(msg.sender, Sender::Ai);
        assert!(msg.actions.is_none());

        let msg = chat_fallback(&AssistantError::EmptyResponse {
            path: CallPath::Chat,
        });
        assert_eq!(
            msg.text,
            "Connection Error: AI returned an empty response without clear error details.. Please check your internet or API key."
        );
    }

    #[test]
    fn test_chat_missing_configuration_is_stated_verbatim() {
        let msg = chat_fallback(&AssistantError::ConfigurationMissing);
        assert_eq!(
            msg.text,
            "AI Configuration Missing: Please add GEMINI_API_KEY to your .env file."
        );
    }
}

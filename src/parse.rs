use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AssistantError, Result};
use crate::models::{DiagnosisResult, Severity};

pub const DEFAULT_DIAGNOSIS: &str = "Analysis Complete";
pub const DEFAULT_RECOMMENDATION: &str =
    "Consult a healthcare professional for a proper evaluation.";

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid fence regex"));

/// Remove every markdown fence marker (```` ```json ```` or ```` ``` ````) and trim.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Parse JSON a model wrapped in markdown. Falls back to the outermost `{...}`
/// span when there is prose around the object.
pub fn parse_lenient_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let cleaned = strip_code_fences(text);
    let first_err = match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<T>(&cleaned[start..=end]) {
                tracing::debug!("Recovered JSON object from surrounding text");
                return Ok(value);
            }
        }
    }

    Err(AssistantError::MalformedResult(first_err.to_string()))
}

#[derive(Debug, Deserialize, Default)]
struct RawDiagnosis {
    #[serde(default)]
    diagnosis: Option<String>,
    #[serde(default)]
    recommendations: Option<Recommendations>,
    #[serde(default)]
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Recommendations {
    List(Vec<String>),
    Single(String),
}

/// Parse the model's reply into a fully populated [`DiagnosisResult`].
pub fn parse_diagnosis(text: &str) -> Result<DiagnosisResult> {
    let raw: RawDiagnosis = parse_lenient_json(text)?;
    Ok(normalize(raw))
}

fn normalize(raw: RawDiagnosis) -> DiagnosisResult {
    let diagnosis = raw
        .diagnosis
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIAGNOSIS.to_string());

    let mut recommendations: Vec<String> = match raw.recommendations {
        Some(Recommendations::List(list)) => list,
        Some(Recommendations::Single(one)) => vec![one],
        None => Vec::new(),
    };
    recommendations.retain(|r| !r.trim().is_empty());
    if recommendations.is_empty() {
        tracing::warn!("Diagnosis reply had no recommendations - using default");
        recommendations.push(DEFAULT_RECOMMENDATION.to_string());
    }

    let severity = match raw.severity.as_deref() {
        None | Some("") => Severity::Low,
        Some(label) => Severity::from_label(label).unwrap_or_else(|| {
            tracing::warn!("Unknown severity '{}' - defaulting to low", label);
            Severity::Low
        }),
    };

    DiagnosisResult {
        diagnosis,
        recommendations,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"diagnosis":"Tension headache","recommendations":["Rest","Hydrate","Monitor"],"severity":"low"}"#;

    fn expected() -> DiagnosisResult {
        DiagnosisResult {
            diagnosis: "Tension headache".to_string(),
            recommendations: vec!["Rest".into(), "Hydrate".into(), "Monitor".into()],
            severity: Severity::Low,
        }
    }

    #[test]
    fn test_fence_variants_parse_identically() {
        let tagged = format!("```json\n{BODY}\n```");
        let bare = format!("```\n{BODY}\n```");
        for text in [BODY.to_string(), tagged, bare] {
            assert_eq!(
                parse_diagnosis(&text).expect("should parse"),
                expected(),
                "input: {text}"
            );
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  ```JSON\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_recovers_object_from_prose() {
        let text = format!("Here is the analysis:\n{BODY}\nStay safe!");
        assert_eq!(parse_diagnosis(&text).expect("should recover"), expected());
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let result = parse_diagnosis("{}").expect("empty object should parse");
        assert_eq!(result.diagnosis, DEFAULT_DIAGNOSIS);
        assert_eq!(result.recommendations, vec![DEFAULT_RECOMMENDATION.to_string()]);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_lenient_field_shapes() {
        let result = parse_diagnosis(
            r#"{"diagnosis":"","recommendations":"See a doctor","severity":"HIGH"}"#,
        )
        .expect("should parse");
        assert_eq!(result.diagnosis, DEFAULT_DIAGNOSIS);
        assert_eq!(result.recommendations, vec!["See a doctor".to_string()]);
        assert_eq!(result.severity, Severity::High);

        let result = parse_diagnosis(r#"{"recommendations":["", "  "],"severity":"moderate"}"#)
            .expect("should parse");
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = parse_diagnosis("I cannot help with that.").expect_err("prose should fail");
        assert!(matches!(err, AssistantError::MalformedResult(_)));
    }
}

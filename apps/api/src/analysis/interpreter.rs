//! Response Interpreter — turns the model's raw reply into an `AnalysisResult`.
//!
//! `interpret` is total: any input string yields a result. A reply that parses
//! as JSON is `Structured`, whatever its shape; anything else is kept verbatim
//! as `RawFallback`.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const JD_MATCH_KEY: &str = "JD Match";
pub const MISSING_KEYWORDS_KEY: &str = "MissingKeywords";
pub const PROFILE_SUMMARY_KEY: &str = "Profile Summary";

pub const DEFAULT_MATCH_PERCENTAGE: &str = "N/A";
pub const DEFAULT_PROFILE_SUMMARY: &str = "No summary provided.";

/// The three fields the prompt asks for. Each may be absent in the reply;
/// accessors fall back to defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    #[serde(rename = "JD Match", skip_serializing_if = "Option::is_none")]
    pub jd_match: Option<String>,
    #[serde(rename = "MissingKeywords")]
    pub missing_keywords: Vec<String>,
    #[serde(rename = "Profile Summary", skip_serializing_if = "Option::is_none")]
    pub profile_summary: Option<String>,
}

impl MatchReport {
    /// Reads the report out of any JSON value. Non-objects and objects without
    /// the expected keys produce an all-defaults report.
    pub fn from_value(value: &Value) -> Self {
        let jd_match = value.get(JD_MATCH_KEY).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let missing_keywords = value
            .get(MISSING_KEYWORDS_KEY)
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(keyword_text).collect())
            .unwrap_or_default();

        let profile_summary = value
            .get(PROFILE_SUMMARY_KEY)
            .and_then(|v| v.as_str())
            .map(String::from);

        Self {
            jd_match,
            missing_keywords,
            profile_summary,
        }
    }

    /// The match percentage as the model wrote it, or `"N/A"`.
    pub fn match_percentage(&self) -> &str {
        self.jd_match.as_deref().unwrap_or(DEFAULT_MATCH_PERCENTAGE)
    }

    /// Numeric match percentage; see `normalize_percentage`.
    pub fn normalized_percentage(&self) -> f64 {
        normalize_percentage(self.match_percentage())
    }

    pub fn missing_keywords(&self) -> &[String] {
        &self.missing_keywords
    }

    pub fn profile_summary(&self) -> &str {
        self.profile_summary
            .as_deref()
            .unwrap_or(DEFAULT_PROFILE_SUMMARY)
    }
}

fn keyword_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Outcome of interpreting one model reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Structured(MatchReport),
    RawFallback { raw_response: String },
}

impl AnalysisResult {
    pub fn is_structured(&self) -> bool {
        matches!(self, AnalysisResult::Structured(_))
    }

    pub fn report(&self) -> Option<&MatchReport> {
        match self {
            AnalysisResult::Structured(report) => Some(report),
            AnalysisResult::RawFallback { .. } => None,
        }
    }
}

/// Interprets a raw model reply. Never panics, never errors.
pub fn interpret(raw: &str) -> AnalysisResult {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            if !value.is_object() {
                debug!("Model reply parsed as non-object JSON; using defaults");
            }
            AnalysisResult::Structured(MatchReport::from_value(&value))
        }
        Err(e) => {
            warn!("Model reply is not valid JSON ({e}); keeping raw text");
            AnalysisResult::RawFallback {
                raw_response: raw.to_string(),
            }
        }
    }
}

/// Converts a match percentage such as `"85%"` to a number.
///
/// Trims whitespace and one trailing `%`, then parses. Unparseable or
/// non-finite values are `0.0`. `"85%"` and `"85"` both give `85.0`.
pub fn normalize_percentage(value: &str) -> f64 {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPLY: &str = r#"{"JD Match":"72%","MissingKeywords":["SQL","Docker"],"Profile Summary":"Solid backend profile"}"#;

    #[test]
    fn test_sample_reply_is_structured() {
        let result = interpret(SAMPLE_REPLY);
        let report = result.report().expect("structured");
        assert_eq!(report.match_percentage(), "72%");
        assert_eq!(report.normalized_percentage(), 72.0);
        assert_eq!(report.missing_keywords(), ["SQL", "Docker"]);
        assert_eq!(report.profile_summary(), "Solid backend profile");
    }

    #[test]
    fn test_malformed_inputs_fall_back_to_raw_text() {
        for raw in ["", "not json", "{", "```json\n{\"JD Match\":\"50%\"}\n```", "  "] {
            assert_eq!(
                interpret(raw),
                AnalysisResult::RawFallback {
                    raw_response: raw.to_string()
                },
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn test_json_array_is_structured_with_defaults() {
        let result = interpret(r#"["SQL", 1, {"JD Match": "90%"}]"#);
        let report = result.report().expect("structured");
        assert_eq!(report.match_percentage(), "N/A");
        assert!(report.missing_keywords().is_empty());
        assert_eq!(report.profile_summary(), "No summary provided.");
    }

    #[test]
    fn test_object_without_expected_keys_uses_defaults() {
        let result = interpret(r#"{"score": 10}"#);
        assert_eq!(result, AnalysisResult::Structured(MatchReport::default()));
        assert_eq!(result.report().unwrap().normalized_percentage(), 0.0);
    }

    #[test]
    fn test_scalar_json_is_structured() {
        assert!(interpret("42").is_structured());
        assert!(interpret("null").is_structured());
        assert!(interpret("\"text\"").is_structured());
    }

    #[test]
    fn test_numeric_jd_match_is_kept_as_text() {
        let report = MatchReport::from_value(&serde_json::json!({"JD Match": 64.5}));
        assert_eq!(report.match_percentage(), "64.5");
        assert_eq!(report.normalized_percentage(), 64.5);
    }

    #[test]
    fn test_missing_keywords_leniency() {
        let report = MatchReport::from_value(&serde_json::json!({
            "MissingKeywords": ["Kafka", 3, null, ["nested"], true, "AWS"]
        }));
        assert_eq!(report.missing_keywords(), ["Kafka", "3", "true", "AWS"]);

        let report = MatchReport::from_value(&serde_json::json!({"MissingKeywords": "Kafka"}));
        assert!(report.missing_keywords().is_empty());
    }

    #[test]
    fn test_normalize_percentage_trailing_percent_is_idempotent() {
        assert_eq!(normalize_percentage("85%"), 85.0);
        assert_eq!(normalize_percentage("85"), 85.0);
        assert_eq!(normalize_percentage(" 85 % "), 85.0);
    }

    #[test]
    fn test_normalize_percentage_invalid_is_zero() {
        assert_eq!(normalize_percentage("abc"), 0.0);
        assert_eq!(normalize_percentage("N/A"), 0.0);
        assert_eq!(normalize_percentage(""), 0.0);
        assert_eq!(normalize_percentage("%"), 0.0);
        assert_eq!(normalize_percentage("NaN"), 0.0);
        assert_eq!(normalize_percentage("inf%"), 0.0);
    }

    #[test]
    fn test_normalization_does_not_mutate_result() {
        let result = interpret(SAMPLE_REPLY);
        let _ = result.report().unwrap().normalized_percentage();
        assert_eq!(result.report().unwrap().match_percentage(), "72%");
    }

    #[test]
    fn test_raw_fallback_serializes_raw_response_key() {
        let result = interpret("model said no");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"raw_response": "model said no"}));
    }
}

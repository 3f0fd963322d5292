//! Parsing and validation of raw model output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::schema::AnalysisSchema;
use crate::{Error, Result};

/// Key under which usage counters are attached to the result.
pub const TOKEN_USAGE_KEY: &str = "tokenUsage";

/// Token counters reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub response_tokens: u64,
    pub total_tokens: u64,
}

/// How schema violations in model output are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Reject output with any violation.
    #[default]
    Strict,
    /// Log violations and return the output unchanged.
    Lenient,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Lenient => "lenient",
        }
    }
}

impl FromStr for ValidationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "lenient" => Ok(ValidationMode::Lenient),
            other => Err(Error::Config(format!(
                "Unknown validation mode '{}' (expected 'strict' or 'lenient')",
                other
            ))),
        }
    }
}

/// A validated analysis report, serialized as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Usage counters attached by [`normalize`], if any.
    pub fn token_usage(&self) -> Option<TokenUsage> {
        self.0
            .get(TOKEN_USAGE_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Parse, validate and annotate raw model output.
///
/// Never returns a partially parsed object: either the whole text parses to
/// a JSON object or the call fails with [`Error::MalformedOutput`].
pub fn normalize(
    raw: &str,
    usage: Option<TokenUsage>,
    schema: &AnalysisSchema,
    mode: ValidationMode,
) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| Error::MalformedOutput(format!("Model output is not valid JSON: {}", e)))?;

    let Value::Object(mut object) = value else {
        return Err(Error::MalformedOutput(
            "Model output is not a JSON object".into(),
        ));
    };

    let violations = schema.validate(&object);
    if !violations.is_empty() {
        let listed: Vec<String> = violations.iter().map(ToString::to_string).collect();
        match mode {
            ValidationMode::Strict => {
                return Err(Error::MalformedOutput(format!(
                    "Model output violates schema: {}",
                    listed.join("; ")
                )));
            }
            ValidationMode::Lenient => {
                warn!(
                    subsystem = "pipeline",
                    component = "normalizer",
                    op = "validate",
                    violation_count = violations.len(),
                    violations = %listed.join("; "),
                    "Passing through model output with schema violations"
                );
            }
        }
    }

    if let Some(usage) = usage {
        let usage = serde_json::to_value(usage)
            .map_err(|e| Error::Internal(format!("Failed to encode token usage: {}", e)))?;
        object.insert(TOKEN_USAGE_KEY.to_string(), usage);
    }

    Ok(AnalysisResult(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use serde_json::json;

    /// Small schema with six required fields of every kind.
    fn schema() -> AnalysisSchema {
        AnalysisSchema::new(vec![
            FieldSpec::string("s", "summary"),
            FieldSpec::enumeration("g", "grade", &["low", "high"]),
            FieldSpec::object("d", "details", vec![FieldSpec::string("x", "x")]),
            FieldSpec::string_array("r", "recapture"),
            FieldSpec::object_array("e", "extras", vec![FieldSpec::string("y", "y")]),
            FieldSpec::string("w", "wrap-up"),
        ])
    }

    fn complete() -> Value {
        json!({
            "s": "ok",
            "g": "high",
            "d": { "x": "1" },
            "r": ["a"],
            "e": [{ "y": "2" }],
            "w": "done"
        })
    }

    fn usage() -> TokenUsage {
        TokenUsage {
            prompt_tokens: 1200,
            response_tokens: 300,
            total_tokens: 1500,
        }
    }

    #[test]
    fn test_valid_output_passes() {
        let raw = complete().to_string();
        let result = normalize(&raw, None, &schema(), ValidationMode::Strict).unwrap();
        assert_eq!(result.clone().into_value(), complete());
        assert!(result.token_usage().is_none());
    }

    #[test]
    fn test_usage_attached() {
        let raw = complete().to_string();
        let result = normalize(&raw, Some(usage()), &schema(), ValidationMode::Strict).unwrap();
        let value = result.clone().into_value();
        assert_eq!(value["tokenUsage"]["promptTokens"], 1200);
        assert_eq!(value["tokenUsage"]["responseTokens"], 300);
        assert_eq!(value["tokenUsage"]["totalTokens"], 1500);
        assert_eq!(result.token_usage(), Some(usage()));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = normalize("Sure! Here is", None, &schema(), ValidationMode::Lenient).unwrap_err();
        assert!(matches!(err, Error::MalformedOutput(_)));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let raw = r#"{"s": "ok", "g": "hi"#;
        let err = normalize(raw, Some(usage()), &schema(), ValidationMode::Lenient).unwrap_err();
        assert!(matches!(err, Error::MalformedOutput(_)));
    }

    #[test]
    fn test_fenced_json_is_malformed() {
        let raw = format!("```json\n{}\n```", complete());
        let err = normalize(&raw, None, &schema(), ValidationMode::Strict).unwrap_err();
        assert!(matches!(err, Error::MalformedOutput(_)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = normalize("[1,2,3]", None, &schema(), ValidationMode::Lenient).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn test_strict_rejects_each_missing_field() {
        for key in ["s", "g", "d", "r", "e", "w"] {
            let mut value = complete();
            value.as_object_mut().unwrap().remove(key);
            let err = normalize(&value.to_string(), None, &schema(), ValidationMode::Strict)
                .unwrap_err();
            assert!(matches!(err, Error::MalformedOutput(_)));
            assert!(err.to_string().contains(key), "{} not reported", key);
        }
    }

    #[test]
    fn test_strict_rejects_enum_violation() {
        let mut value = complete();
        value["g"] = json!("medium");
        let err = normalize(&value.to_string(), None, &schema(), ValidationMode::Strict).unwrap_err();
        assert!(err.to_string().contains("'medium' is not an allowed value"));
    }

    #[test]
    fn test_lenient_passes_missing_fields_unmodified() {
        for key in ["s", "g", "d", "r", "e", "w"] {
            let mut value = complete();
            value.as_object_mut().unwrap().remove(key);
            let result =
                normalize(&value.to_string(), None, &schema(), ValidationMode::Lenient).unwrap();
            assert_eq!(result.into_value(), value);
        }
    }

    #[test]
    fn test_lenient_still_attaches_usage() {
        let mut value = complete();
        value.as_object_mut().unwrap().remove("w");
        let result =
            normalize(&value.to_string(), Some(usage()), &schema(), ValidationMode::Lenient)
                .unwrap();
        assert_eq!(result.token_usage(), Some(usage()));
    }

    #[test]
    fn test_validation_mode_parsing() {
        assert_eq!("strict".parse::<ValidationMode>().unwrap(), ValidationMode::Strict);
        assert_eq!(" Lenient ".parse::<ValidationMode>().unwrap(), ValidationMode::Lenient);
        assert!(matches!(
            "loose".parse::<ValidationMode>(),
            Err(Error::Config(_))
        ));
        assert_eq!(ValidationMode::default(), ValidationMode::Strict);
    }
}

//! Model listing helpers and the recommended model table.

use serde_json::Value;

/// A model known to work well for portrait analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendedModel {
    pub name: &'static str,
    pub note: &'static str,
}

/// Models suggested when the configured one is unavailable.
pub const RECOMMENDED_MODELS: &[RecommendedModel] = &[
    RecommendedModel {
        name: "gemini-2.0-flash",
        note: "Default; fast with structured output support",
    },
    RecommendedModel {
        name: "gemini-1.5-flash",
        note: "Fastest, highest rate limits",
    },
    RecommendedModel {
        name: "gemini-1.5-pro",
        note: "More thorough, lower rate limits",
    },
    RecommendedModel {
        name: "gemini-pro",
        note: "Legacy, text focused",
    },
];

/// Bare model name from a listing entry (`models/x` becomes `x`).
pub fn model_id(model: &Value) -> Option<&str> {
    let name = model.get("name")?.as_str()?;
    Some(name.strip_prefix("models/").unwrap_or(name))
}

/// Whether a listing entry advertises `generateContent`.
pub fn supports_generation(model: &Value) -> bool {
    model
        .get("supportedGenerationMethods")
        .and_then(Value::as_array)
        .map(|methods| methods.iter().any(|m| m.as_str() == Some("generateContent")))
        .unwrap_or(false)
}

/// Recommended models that appear in a provider listing.
pub fn available_recommendations(models: &[Value]) -> Vec<&'static RecommendedModel> {
    RECOMMENDED_MODELS
        .iter()
        .filter(|r| models.iter().any(|m| model_id(m) == Some(r.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Vec<Value> {
        vec![
            json!({
                "name": "models/gemini-1.5-flash",
                "supportedGenerationMethods": ["generateContent", "countTokens"]
            }),
            json!({
                "name": "models/text-embedding-004",
                "supportedGenerationMethods": ["embedContent"]
            }),
            json!({ "displayName": "no name" }),
        ]
    }

    #[test]
    fn test_model_id_strips_prefix() {
        let models = listing();
        assert_eq!(model_id(&models[0]), Some("gemini-1.5-flash"));
        assert_eq!(model_id(&json!({ "name": "bare" })), Some("bare"));
        assert_eq!(model_id(&models[2]), None);
    }

    #[test]
    fn test_supports_generation() {
        let models = listing();
        assert!(supports_generation(&models[0]));
        assert!(!supports_generation(&models[1]));
        assert!(!supports_generation(&models[2]));
    }

    #[test]
    fn test_available_recommendations() {
        let found = available_recommendations(&listing());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "gemini-1.5-flash");
    }

    #[test]
    fn test_default_model_is_recommended() {
        assert!(RECOMMENDED_MODELS
            .iter()
            .any(|m| m.name == photolens_core::defaults::GEMINI_MODEL));
    }
}

//! The fixed ten-field evaluation schema.

use serde::{Deserialize, Deserializer, Serialize};

/// Marker written into every note field when a response cannot be used.
pub const ERROR_MARKER: &str = "Error processing response";

/// Structured model evaluation of one candidate: four sub-scores and an
/// overall score on a 1–10 scale, plus a justification note per dimension.
///
/// Deserialization is tolerant by design — the model occasionally drops
/// fields or quotes numbers. Missing scores coerce to 0.0, missing notes to
/// the empty string, quoted numbers parse through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default, deserialize_with = "lenient_score")]
    pub technical_skills: f64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub experience_relevance: f64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub cultural_fit: f64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub domain_knowledge: f64,
    #[serde(default, deserialize_with = "lenient_score")]
    pub overall_score: f64,
    #[serde(default)]
    pub domain_knowledge_notes: String,
    #[serde(default)]
    pub technical_notes: String,
    #[serde(default)]
    pub experience_notes: String,
    #[serde(default)]
    pub cultural_notes: String,
    #[serde(default)]
    pub overall_explanation: String,
}

impl EvaluationResult {
    /// The degraded result used when the model call or parse fails: all
    /// scores zero, every note the explicit error marker.
    pub fn error_fallback() -> Self {
        Self {
            domain_knowledge_notes: ERROR_MARKER.to_string(),
            technical_notes: ERROR_MARKER.to_string(),
            experience_notes: ERROR_MARKER.to_string(),
            cultural_notes: ERROR_MARKER.to_string(),
            overall_explanation: ERROR_MARKER.to_string(),
            ..Self::default()
        }
    }
}

/// Accepts a JSON number or a quoted number; any other shape scores 0.0.
fn lenient_score<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(de)? {
        Raw::Num(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0.0),
        Raw::Other(_) => 0.0,
    })
}

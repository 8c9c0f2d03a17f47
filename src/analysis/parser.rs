use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::heatmap;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{AnalysisResult, Sentiment, NEUTRAL_SCORE};

/// Which reply values count as "missing" when filling defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPolicy {
    /// Missing, null, false, 0 and "" all fall back to the default.
    /// A reported probability of 0 therefore becomes 50.
    #[default]
    Falsy,
    /// Only missing or null fields fall back to the default.
    Absent,
}

impl DefaultPolicy {
    fn is_missing(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (_, None) | (_, Some(Value::Null)) => true,
            (DefaultPolicy::Absent, Some(_)) => false,
            (DefaultPolicy::Falsy, Some(v)) => is_falsy(v),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Remove markdown code fences the model may wrap its JSON in.
/// Literal removal of every "```json" and "```" marker (each with an optional trailing newline).
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a model reply into an `AnalysisResult`, drawing heatmap noise from the thread RNG.
pub fn parse_analysis_response(raw: &str, policy: DefaultPolicy) -> AnalyzerResult<AnalysisResult> {
    parse_analysis_response_with(&mut rand::thread_rng(), raw, policy)
}

pub fn parse_analysis_response_with<R: Rng + ?Sized>(
    rng: &mut R,
    raw: &str,
    policy: DefaultPolicy,
) -> AnalyzerResult<AnalysisResult> {
    let cleaned = strip_code_fences(raw);
    let parsed: Value = serde_json::from_str(&cleaned)?;

    let fields = parsed.as_object().ok_or_else(|| {
        AnalyzerError::MalformedReply(format!(
            "expected a JSON object, got {}",
            type_name(&parsed)
        ))
    })?;

    let bullish_probability = probability(fields, "bullishProbability", policy);
    let bearish_probability = probability(fields, "bearishProbability", policy);

    Ok(AnalysisResult {
        bullish_probability,
        bearish_probability,
        technical_analysis: text(fields, "technicalAnalysis", policy),
        fundamental_analysis: text(fields, "fundamentalAnalysis", policy),
        recommendation: text(fields, "recommendation", policy),
        risks: text(fields, "risks", policy),
        sentiment: sentiment(fields.get("sentiment"), policy),
        // Never taken from the reply
        heatmap_data: heatmap::synthesize_heatmap_with(rng, bullish_probability),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Integer score from a number or numeric string.
fn score(value: &Value) -> Option<i32> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if f.is_finite() {
        Some(f.round() as i32)
    } else {
        None
    }
}

fn probability(fields: &Map<String, Value>, key: &str, policy: DefaultPolicy) -> i32 {
    let value = fields.get(key);
    if policy.is_missing(value) {
        return NEUTRAL_SCORE;
    }
    value.and_then(score).unwrap_or(NEUTRAL_SCORE)
}

fn text(fields: &Map<String, Value>, key: &str, policy: DefaultPolicy) -> String {
    let value = fields.get(key);
    if policy.is_missing(value) {
        return String::new();
    }
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Whole-record default only. Sub-fields the model left out stay `None`.
fn sentiment(value: Option<&Value>, policy: DefaultPolicy) -> Sentiment {
    if policy.is_missing(value) {
        return Sentiment::neutral();
    }
    match value {
        Some(Value::Object(record)) => Sentiment {
            economic: record.get("economic").and_then(score),
            market: record.get("market").and_then(score),
            technical: record.get("technical").and_then(score),
            news: record.get("news").and_then(score),
        },
        _ => Sentiment::default(),
    }
}

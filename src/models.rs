use serde::{Deserialize, Serialize};

use crate::chart::ChartImage;

pub const HEATMAP_CELLS: usize = 28;
pub const NEUTRAL_SCORE: i32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub image: ChartImage,
    pub currency_pair: String,
    pub timeframe: String,
}

impl AnalysisRequest {
    pub fn new(
        image: ChartImage,
        currency_pair: impl Into<String>,
        timeframe: impl Into<String>,
    ) -> Self {
        Self {
            image,
            currency_pair: currency_pair.into(),
            timeframe: timeframe.into(),
        }
    }

    /// A real remote call needs every field filled in.
    pub fn is_complete(&self) -> bool {
        !self.image.data.is_empty()
            && !self.image.mime_type.is_empty()
            && !self.currency_pair.trim().is_empty()
            && !self.timeframe.trim().is_empty()
    }
}

/// Directional breakdown, each 0-100. Fields stay `None` when a model reply
/// carried a sentiment object without them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub economic: Option<i32>,
    pub market: Option<i32>,
    pub technical: Option<i32>,
    pub news: Option<i32>,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self {
            economic: Some(NEUTRAL_SCORE),
            market: Some(NEUTRAL_SCORE),
            technical: Some(NEUTRAL_SCORE),
            news: Some(NEUTRAL_SCORE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub bullish_probability: i32,
    pub bearish_probability: i32,
    pub technical_analysis: String,
    pub fundamental_analysis: String,
    pub recommendation: String,
    pub risks: String,
    pub sentiment: Sentiment,
    pub heatmap_data: Vec<f64>,
}

/// Why a result was synthesized locally instead of coming from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    DemoMode,
    IncompleteRequest,
    TransportFailure,
    MalformedReply,
}

impl FallbackReason {
    pub fn describe(&self) -> &'static str {
        match self {
            FallbackReason::DemoMode => "demo mode (no API key)",
            FallbackReason::IncompleteRequest => "request missing image, pair or timeframe",
            FallbackReason::TransportFailure => "remote call failed",
            FallbackReason::MalformedReply => "model reply could not be parsed",
        }
    }
}

/// Result plus where it came from. Callers that only need the data use `into_result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Remote { result: AnalysisResult, model: String },
    Simulated { result: AnalysisResult, reason: FallbackReason },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::Remote { result, .. } => result,
            AnalysisOutcome::Simulated { result, .. } => result,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Remote { result, .. } => result,
            AnalysisOutcome::Simulated { result, .. } => result,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AnalysisOutcome::Remote { .. })
    }

    pub fn provenance_label(&self) -> String {
        match self {
            AnalysisOutcome::Remote { model, .. } => format!("Gemini ({})", model),
            AnalysisOutcome::Simulated { reason, .. } => {
                format!("Simulated: {}", reason.describe())
            }
        }
    }
}

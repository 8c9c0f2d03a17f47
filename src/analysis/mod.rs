pub mod heatmap;
pub mod parser;
pub mod report;
pub mod simulator;

use crate::chart::ChartImage;
use crate::error::AnalyzerError;
use crate::llm::gemini::GeminiClient;
use crate::llm::{prompt, LLMSettings, VisionModel};
use crate::models::{AnalysisOutcome, AnalysisRequest, AnalysisResult, FallbackReason};

/// Analyze a chart and always return a usable result.
/// Remote failures degrade silently to a simulated analysis.
pub async fn analyze_chart(settings: &LLMSettings, request: &AnalysisRequest) -> AnalysisResult {
    analyze(settings, request).await.into_result()
}

/// Same as `analyze_chart`, for images still in `data:` URL form.
pub async fn analyze_data_url(
    settings: &LLMSettings,
    image_data_url: &str,
    currency_pair: &str,
    timeframe: &str,
) -> AnalysisResult {
    match ChartImage::from_data_url(image_data_url) {
        Ok(image) => {
            let request = AnalysisRequest::new(image, currency_pair, timeframe);
            analyze_chart(settings, &request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unusable chart image, falling back to simulated analysis");
            simulated(settings, currency_pair, timeframe, FallbackReason::IncompleteRequest)
                .await
                .into_result()
        }
    }
}

/// Run the pipeline against Gemini, or the demo synthesizer when no key is configured.
pub async fn analyze(settings: &LLMSettings, request: &AnalysisRequest) -> AnalysisOutcome {
    match GeminiClient::new(settings) {
        Ok(client) => analyze_with(&client, settings, request).await,
        Err(_) => {
            tracing::info!("Demo mode: using simulated analysis");
            fall_back(settings, request, FallbackReason::DemoMode).await
        }
    }
}

/// Pipeline against any vision model. Never fails; the outcome records whether it fell back.
pub async fn analyze_with<M>(
    model: &M,
    settings: &LLMSettings,
    request: &AnalysisRequest,
) -> AnalysisOutcome
where
    M: VisionModel + ?Sized,
{
    if !request.is_complete() {
        tracing::warn!(
            pair = %request.currency_pair,
            timeframe = %request.timeframe,
            "Incomplete analysis request, falling back to simulated analysis"
        );
        return fall_back(settings, request, FallbackReason::IncompleteRequest).await;
    }

    // 1. Build prompt
    let prompt = prompt::build_analysis_prompt(&request.currency_pair, &request.timeframe);

    // 2. Call the model
    tracing::info!(
        model = model.name(),
        pair = %request.currency_pair,
        timeframe = %request.timeframe,
        "Requesting chart analysis"
    );
    let raw = match model.generate(&prompt, &request.image).await {
        Ok(raw) => raw,
        Err(e) => {
            let reason = fallback_reason(&e);
            tracing::warn!(
                error = %e,
                ?reason,
                "AI analysis failed, falling back to simulated analysis"
            );
            return fall_back(settings, request, reason).await;
        }
    };

    // 3. Parse and fill defaults
    match parser::parse_analysis_response(&raw, settings.default_policy) {
        Ok(result) => {
            tracing::debug!(
                bullish = result.bullish_probability,
                bearish = result.bearish_probability,
                "Parsed model reply"
            );
            AnalysisOutcome::Remote {
                result,
                model: model.name().to_string(),
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                reply_len = raw.len(),
                "Failed to parse AI response, falling back to simulated analysis"
            );
            fall_back(settings, request, FallbackReason::MalformedReply).await
        }
    }
}

fn fallback_reason(error: &AnalyzerError) -> FallbackReason {
    match error {
        AnalyzerError::ConfigurationAbsent => FallbackReason::DemoMode,
        AnalyzerError::MalformedReply(_) => FallbackReason::MalformedReply,
        AnalyzerError::InvalidImage(_) => FallbackReason::IncompleteRequest,
        AnalyzerError::Transport(_) | AnalyzerError::Status { .. } | AnalyzerError::Io(_) => {
            FallbackReason::TransportFailure
        }
    }
}

async fn fall_back(
    settings: &LLMSettings,
    request: &AnalysisRequest,
    reason: FallbackReason,
) -> AnalysisOutcome {
    simulated(settings, &request.currency_pair, &request.timeframe, reason).await
}

async fn simulated(
    settings: &LLMSettings,
    currency_pair: &str,
    timeframe: &str,
    reason: FallbackReason,
) -> AnalysisOutcome {
    let result = simulator::simulate_analysis(currency_pair, timeframe, settings.demo_delay).await;
    AnalysisOutcome::Simulated { result, reason }
}

pub mod analysis;
pub mod chart;
pub mod error;
pub mod llm;
pub mod markets;
pub mod models;

pub use analysis::{analyze, analyze_chart, analyze_data_url, analyze_with};
pub use chart::ChartImage;
pub use error::{AnalyzerError, AnalyzerResult};
pub use llm::LLMSettings;
pub use models::{AnalysisOutcome, AnalysisRequest, AnalysisResult, FallbackReason, Sentiment};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared start-up for the binaries: load `.env`, then install a tracing subscriber
/// filtered by `RUST_LOG` (defaults to info for this crate).
pub fn init_runtime() -> LLMSettings {
    // Optional - won't fail if missing
    dotenvy::dotenv().ok();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fx_chart_analyzer_lib=info,fx_chart_analyzer=info".into()),
        )
        .try_init();

    LLMSettings::from_env()
}

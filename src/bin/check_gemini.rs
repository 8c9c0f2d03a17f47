use fx_chart_analyzer_lib::llm::gemini;
use fx_chart_analyzer_lib::{init_runtime, AnalyzerError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = init_runtime();

    println!("🔍 Diagnostic - Gemini endpoint: {}", settings.api_base);
    println!("Model: {}", settings.model);
    println!(
        "API key: {}",
        settings
            .api_key
            .as_ref()
            .map(|k| format!("{} chars", k.len()))
            .unwrap_or_else(|| "not set".to_string())
    );

    match gemini::test_connection(&settings).await {
        Ok(true) => println!("✅ Key accepted, model available."),
        Ok(false) => println!("❌ Endpoint rejected the key or model."),
        Err(AnalyzerError::ConfigurationAbsent) => {
            println!("⚠️  GEMINI_API_KEY is not set. Analyses will run in demo mode.")
        }
        Err(e) => {
            println!("❌ Connection failed: {}", e);
            return Err(e.into());
        }
    }

    println!("\nDone.");
    Ok(())
}

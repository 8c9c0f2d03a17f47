use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use fx_chart_analyzer_lib::analysis::report::ReportView;
use fx_chart_analyzer_lib::markets::{self, MarketOption, DEFAULT_PAIR, DEFAULT_TIMEFRAME};
use fx_chart_analyzer_lib::{analyze, init_runtime, AnalysisRequest, ChartImage};

#[derive(Parser, Debug)]
#[command(name = "fx-chart-analyzer", version, about = "AI commentary for FX chart screenshots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a chart image
    Analyze {
        /// Path to the chart screenshot (png, jpg, gif, webp, ...)
        #[arg(short, long)]
        image: PathBuf,

        /// Currency pair, e.g. EUR/USD
        #[arg(short, long, default_value = DEFAULT_PAIR)]
        pair: String,

        /// Chart timeframe, e.g. 4H
        #[arg(short, long, default_value = DEFAULT_TIMEFRAME)]
        timeframe: String,

        /// Print the raw result as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// List supported currency pairs
    Pairs,
    /// List supported timeframes
    Timeframes,
}

fn print_options(options: &[MarketOption]) {
    for option in options {
        println!("{:<8} {}", option.value, option.label);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = init_runtime();
    let cli = Cli::parse();

    match cli.command {
        Command::Pairs => print_options(markets::CURRENCY_PAIRS),
        Command::Timeframes => print_options(markets::TIMEFRAMES),
        Command::Analyze { image, pair, timeframe, json } => {
            let pair = markets::find_pair(&pair).ok_or_else(|| {
                anyhow!("Unsupported currency pair '{}'. Run `fx-chart-analyzer pairs`.", pair)
            })?;
            let timeframe = markets::find_timeframe(&timeframe).ok_or_else(|| {
                anyhow!(
                    "Unsupported timeframe '{}'. Run `fx-chart-analyzer timeframes`.",
                    timeframe
                )
            })?;

            let chart = ChartImage::from_path(&image)
                .await
                .with_context(|| format!("Failed to load chart {}", image.display()))?;

            if settings.is_demo_mode() {
                tracing::info!("GEMINI_API_KEY not set, results will be simulated");
            }

            let request = AnalysisRequest::new(chart, pair.value, timeframe.value);
            let outcome = analyze(&settings, &request).await;

            if json {
                println!("{}", serde_json::to_string_pretty(outcome.result())?);
            } else {
                let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
                let header = format!(
                    "{} {} | {} | {}",
                    pair.value,
                    timeframe.label,
                    outcome.provenance_label(),
                    generated_at
                );
                print!("{}", ReportView::from(outcome.result()).render_text(&header));
            }
        }
    }

    Ok(())
}

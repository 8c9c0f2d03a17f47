use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use super::heatmap;
use crate::markets::split_pair;
use crate::models::{AnalysisResult, Sentiment};

const CHART_PATTERNS: &[&str] = &[
    "a rebound off the support line",
    "price being capped at the resistance line",
    "early signs of a double bottom",
    "a possible head and shoulders formation",
    "a golden cross of the moving averages",
    "a Bollinger Band squeeze turning into an expansion",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bias {
    Bullish,
    Bearish,
}

impl Bias {
    // Strictly above 50 is bullish; an even 50 reads as bearish.
    fn from_probability(bullish_probability: i32) -> Self {
        if bullish_probability > 50 {
            Bias::Bullish
        } else {
            Bias::Bearish
        }
    }

    fn trend(&self) -> &'static str {
        match self {
            Bias::Bullish => "an uptrend",
            Bias::Bearish => "a downtrend",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Bias::Bullish => "Long",
            Bias::Bearish => "Short",
        }
    }

    fn entry(&self) -> &'static str {
        match self {
            Bias::Bullish => "Look for entries near the support line",
            Bias::Bearish => "Look for entries near the resistance line",
        }
    }

    fn exit_plan(&self) -> &'static str {
        match self {
            Bias::Bullish => "Target the recent high and place the stop below the recent low.",
            Bias::Bearish => "Target the recent low and place the stop above the recent high.",
        }
    }
}

/// Demo-mode analysis. Waits `delay` first so callers see the same "thinking" pause as a real call.
pub async fn simulate_analysis(
    currency_pair: &str,
    timeframe: &str,
    delay: Duration,
) -> AnalysisResult {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    synthesize(currency_pair, timeframe)
}

pub fn synthesize(currency_pair: &str, timeframe: &str) -> AnalysisResult {
    synthesize_with(&mut rand::thread_rng(), currency_pair, timeframe)
}

/// Fabricate a plausible result. Every call redraws all randomness.
pub fn synthesize_with<R: Rng + ?Sized>(
    rng: &mut R,
    currency_pair: &str,
    timeframe: &str,
) -> AnalysisResult {
    // 1. Probabilities: bullish in 35..=65, bearish is the exact complement
    let bullish_probability = (35.0 + rng.gen::<f64>() * 30.0).round() as i32;
    let bearish_probability = 100 - bullish_probability;

    // 2. Direction and a random chart pattern
    let bias = Bias::from_probability(bullish_probability);
    let pattern = CHART_PATTERNS.choose(rng).copied().unwrap_or(CHART_PATTERNS[0]);
    let (base, quote) = split_pair(currency_pair);

    // 3. Report text
    let technical_analysis = format!(
        "The current {} chart ({}) shows {}. In particular there is {}, \
         a technical turning-point or continuation signal. \
         Price action around the nearest support line suggests a double bottom may be forming, \
         and RSI points to a corrective phase with overheating easing off.",
        currency_pair,
        timeframe,
        bias.trend(),
        pattern
    );

    let fundamental_analysis = format!(
        "Key {} economic data has come in above expectations and real-money flows remain firm, \
         with hawkish central bank comments supporting the currency. \
         {} on the other hand is seeing \
         risk-off moves as geopolitical risk rises.",
        base, quote
    );

    let recommendation = format!(
        "{} recommended on {} ({}). {}. {} The setup offers a risk-reward ratio of at least 1:2.",
        bias.action(),
        currency_pair,
        timeframe,
        bias.entry(),
        bias.exit_plan()
    );

    let risks = "Watch for sudden moves on unexpected comments from officials. \
                 Spreads can widen during low-liquidity hours, and fakeouts may trigger stop hunts."
        .to_string();

    // 4. Sentiment; the technical reading mirrors the bullish probability
    let sentiment = Sentiment {
        economic: Some(40 + (rng.gen::<f64>() * 30.0).round() as i32),
        market: Some(35 + (rng.gen::<f64>() * 35.0).round() as i32),
        technical: Some(bullish_probability),
        news: Some(45 + (rng.gen::<f64>() * 20.0).round() as i32),
    };

    // 5. Heatmap
    let heatmap_data = heatmap::synthesize_heatmap_with(rng, bullish_probability);

    AnalysisResult {
        bullish_probability,
        bearish_probability,
        technical_analysis,
        fundamental_analysis,
        recommendation,
        risks,
        sentiment,
        heatmap_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markets::{CURRENCY_PAIRS, TIMEFRAMES};
    use crate::models::HEATMAP_CELLS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_probabilities_complementary_for_all_catalog_entries() {
        let mut rng = StdRng::seed_from_u64(99);
        for pair in CURRENCY_PAIRS {
            for tf in TIMEFRAMES {
                let result = synthesize_with(&mut rng, pair.value, tf.value);
                assert_eq!(result.bullish_probability + result.bearish_probability, 100);
                assert!((35..=65).contains(&result.bullish_probability));
                assert_eq!(result.heatmap_data.len(), HEATMAP_CELLS);
            }
        }
    }

    #[test]
    fn test_sentiment_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let result = synthesize_with(&mut rng, "USD/JPY", "1H");
            let s = result.sentiment;
            assert!((40..=70).contains(&s.economic.unwrap()));
            assert!((35..=70).contains(&s.market.unwrap()));
            assert_eq!(s.technical, Some(result.bullish_probability));
            assert!((45..=65).contains(&s.news.unwrap()));
        }
    }

    #[test]
    fn test_text_mentions_pair_and_timeframe() {
        let result = synthesize("EUR/USD", "4H");
        assert!(result.technical_analysis.contains("EUR/USD"));
        assert!(result.technical_analysis.contains("4H"));
        assert!(result.recommendation.contains("EUR/USD"));
        assert!(result.fundamental_analysis.contains("EUR"));
        assert!(result.fundamental_analysis.contains("USD"));
    }

    #[test]
    fn test_recommendation_follows_probability() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let result = synthesize_with(&mut rng, "GBP/JPY", "1D");
            if result.bullish_probability > 50 {
                assert!(result.recommendation.starts_with("Long"));
                assert!(result.technical_analysis.contains("uptrend"));
            } else {
                assert!(result.recommendation.starts_with("Short"));
                assert!(result.technical_analysis.contains("downtrend"));
            }
        }
    }

    #[test]
    fn test_empty_context_is_tolerated() {
        let result = synthesize("", "");
        assert_eq!(result.bullish_probability + result.bearish_probability, 100);
        assert!(!result.risks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delay() {
        let started = tokio::time::Instant::now();
        let result = simulate_analysis("AUD/USD", "15M", Duration::from_secs(2)).await;
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(result.technical_analysis.contains("AUD/USD"));
    }
}

/// Build the chart analysis prompt for a currency pair and timeframe.
/// The model is asked for bare JSON matching `AnalysisResult` minus the heatmap.
pub fn build_analysis_prompt(currency_pair: &str, timeframe: &str) -> String {
    format!(r#"
You are a professional FX trader and market analyst. Analyze the attached chart image.

Currency pair: {}
Timeframe: {}

Reply in JSON using exactly this format:
{{
  "bullishProbability": probability of a rise (number 0-100),
  "bearishProbability": probability of a fall (number 0-100),
  "technicalAnalysis": "detailed technical analysis: concrete chart patterns (e.g. 'a double bottom may form if price touches the support line'), moving averages, RSI and other indicators",
  "fundamentalAnalysis": "fundamental view: economic data, monetary policy, geopolitical risk",
  "recommendation": "recommended action (long / short / wait) and the concrete reason (e.g. 'buy the bounce near support')",
  "risks": "main risk factors and cautions",
  "sentiment": {{
    "economic": how positive the economic data is (0-100),
    "market": how positive market psychology is (0-100),
    "technical": how bullish the technical indicators are (0-100),
    "news": how positive news sentiment is (0-100)
  }}
}}

Return JSON only. Do not wrap it in a markdown code block.
"#,
        currency_pair,
        timeframe
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_context() {
        let prompt = build_analysis_prompt("USD/JPY", "1H");
        assert!(prompt.contains("Currency pair: USD/JPY"));
        assert!(prompt.contains("Timeframe: 1H"));
    }

    #[test]
    fn test_prompt_lists_schema_fields() {
        let prompt = build_analysis_prompt("EUR/USD", "4H");
        for field in [
            "bullishProbability",
            "bearishProbability",
            "technicalAnalysis",
            "fundamentalAnalysis",
            "recommendation",
            "risks",
            "sentiment",
            "economic",
            "market",
            "technical",
            "news",
        ] {
            assert!(prompt.contains(&format!("\"{}\"", field)), "missing {}", field);
        }
        assert!(!prompt.contains("heatmap"));
    }

    #[test]
    fn test_prompt_accepts_any_string() {
        let prompt = build_analysis_prompt("", "");
        assert!(prompt.contains("Currency pair: \n"));
    }
}

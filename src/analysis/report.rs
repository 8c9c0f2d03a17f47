use std::fmt::Write as _;

use serde::Serialize;

use crate::models::{AnalysisResult, Sentiment, HEATMAP_CELLS, NEUTRAL_SCORE};

const NOT_AVAILABLE: &str = "N/A";
const HEATMAP_COLUMNS: usize = 7;
const GAUGE_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTone {
    Bullish,
    Neutral,
    Bearish,
}

impl SentimentTone {
    pub fn from_score(score: i32) -> Self {
        if score >= 60 {
            SentimentTone::Bullish
        } else if score <= 40 {
            SentimentTone::Bearish
        } else {
            SentimentTone::Neutral
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentRow {
    pub label: &'static str,
    pub score: i32,
    pub tone: SentimentTone,
}

/// What a front-end shows: text fields fall back to "N/A" and every sentiment
/// field falls back to 50 on its own.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportView {
    pub bullish_probability: i32,
    pub bearish_probability: i32,
    pub technical_analysis: String,
    pub fundamental_analysis: String,
    pub recommendation: String,
    pub risks: String,
    pub sentiment: Vec<SentimentRow>,
    pub heatmap: Vec<f64>,
}

fn or_na(text: &str) -> String {
    if text.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}

fn sentiment_rows(sentiment: &Sentiment) -> Vec<SentimentRow> {
    [
        ("Economic", sentiment.economic),
        ("Market", sentiment.market),
        ("Technical", sentiment.technical),
        ("News", sentiment.news),
    ]
    .into_iter()
    .map(|(label, value)| {
        let score = value.filter(|v| *v != 0).unwrap_or(NEUTRAL_SCORE);
        SentimentRow { label, score, tone: SentimentTone::from_score(score) }
    })
    .collect()
}

impl From<&AnalysisResult> for ReportView {
    fn from(result: &AnalysisResult) -> Self {
        // Missing cells render as neutral
        let mut heatmap: Vec<f64> =
            result.heatmap_data.iter().take(HEATMAP_CELLS).copied().collect();
        heatmap.resize(HEATMAP_CELLS, 0.0);

        ReportView {
            bullish_probability: result.bullish_probability,
            bearish_probability: result.bearish_probability,
            technical_analysis: or_na(&result.technical_analysis),
            fundamental_analysis: or_na(&result.fundamental_analysis),
            recommendation: or_na(&result.recommendation),
            risks: or_na(&result.risks),
            sentiment: sentiment_rows(&result.sentiment),
            heatmap,
        }
    }
}

fn gauge(percent: i32) -> String {
    let filled = (percent.clamp(0, 100) as usize * GAUGE_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}

impl ReportView {
    /// Plain-text rendering for terminals.
    pub fn render_text(&self, header: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", header);
        let _ = writeln!(out, "{}", "=".repeat(header.chars().count().max(20)));
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "Bullish {:>3}% {}",
            self.bullish_probability,
            gauge(self.bullish_probability)
        );
        let _ = writeln!(
            out,
            "Bearish {:>3}% {}",
            self.bearish_probability,
            gauge(self.bearish_probability)
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "Heatmap");
        for row in self.heatmap.chunks(HEATMAP_COLUMNS) {
            let cells: Vec<String> = row.iter().map(|v| format!("{:+.2}", v)).collect();
            let _ = writeln!(out, "  {}", cells.join(" "));
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Sentiment");
        for row in &self.sentiment {
            let tone = match row.tone {
                SentimentTone::Bullish => "bullish",
                SentimentTone::Neutral => "neutral",
                SentimentTone::Bearish => "bearish",
            };
            let _ = writeln!(out, "  {:<10} {:>3}% ({})", row.label, row.score, tone);
        }
        let _ = writeln!(out);

        for (title, body) in [
            ("Technical analysis", &self.technical_analysis),
            ("Fundamental analysis", &self.fundamental_analysis),
            ("Recommendation", &self.recommendation),
            ("Risks", &self.risks),
        ] {
            let _ = writeln!(out, "## {}", title);
            let _ = writeln!(out, "{}", body);
            let _ = writeln!(out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(sentiment: Sentiment, text: &str) -> AnalysisResult {
        AnalysisResult {
            bullish_probability: 64,
            bearish_probability: 36,
            technical_analysis: text.to_string(),
            fundamental_analysis: String::new(),
            recommendation: "Long".to_string(),
            risks: "   ".to_string(),
            sentiment,
            heatmap_data: vec![0.5; HEATMAP_CELLS],
        }
    }

    #[test]
    fn test_text_defaults_to_na() {
        let view = ReportView::from(&result_with(Sentiment::neutral(), ""));
        assert_eq!(view.technical_analysis, "N/A");
        assert_eq!(view.fundamental_analysis, "N/A");
        assert_eq!(view.risks, "N/A");
        assert_eq!(view.recommendation, "Long");
    }

    #[test]
    fn test_sentiment_fields_default_independently() {
        let sentiment = Sentiment {
            economic: Some(72),
            market: None,
            technical: Some(0),
            news: Some(31),
        };
        let view = ReportView::from(&result_with(sentiment, "x"));
        let scores: Vec<i32> = view.sentiment.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![72, 50, 50, 31]);
        assert_eq!(view.sentiment[0].tone, SentimentTone::Bullish);
        assert_eq!(view.sentiment[1].tone, SentimentTone::Neutral);
        assert_eq!(view.sentiment[3].tone, SentimentTone::Bearish);
    }

    #[test]
    fn test_tone_bands() {
        assert_eq!(SentimentTone::from_score(60), SentimentTone::Bullish);
        assert_eq!(SentimentTone::from_score(59), SentimentTone::Neutral);
        assert_eq!(SentimentTone::from_score(41), SentimentTone::Neutral);
        assert_eq!(SentimentTone::from_score(40), SentimentTone::Bearish);
    }

    #[test]
    fn test_short_heatmap_is_padded() {
        let mut result = result_with(Sentiment::neutral(), "x");
        result.heatmap_data = vec![1.0; 3];
        let view = ReportView::from(&result);
        assert_eq!(view.heatmap.len(), HEATMAP_CELLS);
        assert_eq!(view.heatmap[3], 0.0);
    }

    #[test]
    fn test_render_text() {
        let view = ReportView::from(&result_with(Sentiment::neutral(), "Double bottom"));
        let text = view.render_text("EUR/USD 4H");
        assert!(text.starts_with("EUR/USD 4H\n"));
        assert!(text.contains("Bullish  64%"));
        assert!(text.contains("## Technical analysis\nDouble bottom"));
        assert!(text.contains("## Risks\nN/A"));
        // 4 heatmap rows of 7 cells
        assert_eq!(text.matches("+0.50").count(), HEATMAP_CELLS);
    }

    #[test]
    fn test_gauge_width() {
        assert_eq!(gauge(0), format!("[{}]", ".".repeat(GAUGE_WIDTH)));
        assert_eq!(gauge(100), format!("[{}]", "#".repeat(GAUGE_WIDTH)));
        assert_eq!(gauge(150).len(), GAUGE_WIDTH + 2);
    }
}

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LLMSettings, VisionModel};
use crate::chart::ChartImage;
use crate::error::{AnalyzerError, AnalyzerResult};

// Fixed generation parameters.
const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl<'a> GeminiRequest<'a> {
    pub(crate) fn new(prompt: &'a str, image: &'a ChartImage) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

impl GeminiClient {
    /// Build a client from settings. Fails with `ConfigurationAbsent` when no key is set.
    pub fn new(settings: &LLMSettings) -> AnalyzerResult<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AnalyzerError::ConfigurationAbsent)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("FxChartAnalyzer/1.0"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            api_key,
            model: settings.model.clone(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.api_base, self.model)
    }

    /// Check that the key is accepted and the model exists.
    pub async fn test_connection(&self) -> AnalyzerResult<bool> {
        let response = self
            .client
            .get(self.model_url())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, image: &ChartImage) -> AnalyzerResult<String> {
        // Never log the key itself
        tracing::debug!(
            model = %self.model,
            key_len = self.api_key.len(),
            mime_type = %image.mime_type,
            image_bytes = image.byte_len(),
            "Sending chart to Gemini"
        );

        let request = GeminiRequest::new(prompt, image);

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Status { status, body });
        }

        let body = response.text().await?;
        extract_text(&body)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
pub(crate) fn extract_text(body: &str) -> AnalyzerResult<String> {
    let envelope: GeminiResponse = serde_json::from_str(body)?;

    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            AnalyzerError::MalformedReply(
                "no candidates[0].content.parts[0].text in response".to_string(),
            )
        })
}

/// Test Gemini connectivity with the configured key and model.
pub async fn test_connection(settings: &LLMSettings) -> AnalyzerResult<bool> {
    GeminiClient::new(settings)?.test_connection().await
}

pub mod gemini;
pub mod prompt;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::parser::DefaultPolicy;
use crate::chart::ChartImage;
use crate::error::AnalyzerResult;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_DEMO_DELAY_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// A model that can read a chart image and answer a prompt about it.
#[async_trait]
pub trait VisionModel: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str, image: &ChartImage) -> AnalyzerResult<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMSettings {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub demo_delay: Duration,
    pub request_timeout: Duration,
    pub default_policy: DefaultPolicy,
}

impl Default for LLMSettings {
    fn default() -> Self {
        LLMSettings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            demo_delay: Duration::from_millis(DEFAULT_DEMO_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            default_policy: DefaultPolicy::Falsy,
        }
    }
}

impl LLMSettings {
    /// Load settings from the process environment.
    /// Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = LLMSettings::default();

        if let Some(key) = lookup("GEMINI_API_KEY") {
            let key = key.trim().to_string();
            settings.api_key = if key.is_empty() { None } else { Some(key) };
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            settings.model = model.trim().to_string();
        }
        if let Some(base) = lookup("GEMINI_API_BASE").filter(|v| !v.trim().is_empty()) {
            settings.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = lookup("FX_DEMO_DELAY_MS") {
            match ms.trim().parse::<u64>() {
                Ok(ms) => settings.demo_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %ms, "Ignoring invalid FX_DEMO_DELAY_MS"),
            }
        }
        if let Some(secs) = lookup("FX_REQUEST_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %secs, "Ignoring invalid FX_REQUEST_TIMEOUT_SECS"),
            }
        }
        if let Some(policy) = lookup("FX_DEFAULT_POLICY") {
            settings.default_policy = match policy.trim().to_lowercase().as_str() {
                "absent" => DefaultPolicy::Absent,
                "falsy" => DefaultPolicy::Falsy,
                other => {
                    tracing::warn!(value = %other, "Unknown FX_DEFAULT_POLICY, using falsy");
                    DefaultPolicy::Falsy
                }
            };
        }

        settings
    }

    pub fn is_demo_mode(&self) -> bool {
        self.api_key.is_none()
    }
}

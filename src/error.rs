use thiserror::Error;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// No API key configured. The pipeline treats this as "use demo mode".
    #[error("Gemini API key is not configured")]
    ConfigurationAbsent,

    #[error("Gemini request failed: {0}")]
    Transport(String),

    #[error("Gemini API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    #[error("Invalid chart image: {0}")]
    InvalidImage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AnalyzerError {
    /// The request URL carries the API key as a query parameter, so it is dropped here.
    fn from(e: reqwest::Error) -> Self {
        AnalyzerError::Transport(e.without_url().to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::MalformedReply(e.to_string())
    }
}

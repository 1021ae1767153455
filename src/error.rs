use thiserror::Error;

/// Substring Gemini uses when a model rejects the media type it was given.
pub const CAPABILITY_ERROR_SIGNATURE: &str = "model does not support the provided input";

/// Failures of the analysis gateway.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key is missing. Set GEMINI_API_KEY (or API_KEY) or run `speak-confident config --api-key`.")]
    MissingApiKey,

    /// The model cannot take this modality; the only error that triggers the fallback.
    #[error("model {model} does not support the provided input: {message}")]
    UnsupportedInput { model: String, message: String },

    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request to Gemini failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No response from AI")]
    EmptyResponse,

    #[error("could not parse analysis response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid analysis result: {0}")]
    InvalidResult(String),

    #[error("Both primary and fallback models failed to process the input.")]
    FallbackExhausted {
        primary: Box<AnalysisError>,
        fallback: Box<AnalysisError>,
    },
}

impl AnalysisError {
    pub fn is_capability_error(&self) -> bool {
        matches!(self, Self::UnsupportedInput { .. })
    }
}

/// Map a non-success HTTP reply to the error taxonomy.
pub fn classify_api_error(model: &str, status: u16, message: String) -> AnalysisError {
    if message.to_ascii_lowercase().contains(CAPABILITY_ERROR_SIGNATURE) {
        AnalysisError::UnsupportedInput {
            model: model.to_string(),
            message,
        }
    } else {
        AnalysisError::Api { status, message }
    }
}

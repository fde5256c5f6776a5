use thiserror::Error;

/// Top-level error taxonomy for the analysis surface.
///
/// Branch-local fetch problems never reach the caller through this type —
/// they degrade to empty defaults inside the orchestrator. What remains is
/// the small set of failures the caller must act on.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Generation error: {0}")]
    Generation(String),
}

/// Error from a single upstream fetch pipeline.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no API key available for service '{0}'")]
    NoCredentials(String),

    #[error("upstream request failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error("upstream reported an error: {0}")]
    Upstream(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<FetchError> for AnalysisError {
    fn from(e: FetchError) -> Self {
        AnalysisError::Upstream(e.to_string())
    }
}

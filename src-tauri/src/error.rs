use serde::Serialize;
use thiserror::Error;

/// Failure modes of a craft analysis call.
///
/// Each variant maps to distinct user-facing copy in the frontend, so the
/// UI can tell a rejected key apart from a flaky network. None of these are
/// ever retried automatically.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no usable API key is stored")]
    MissingCredential,

    #[error("API key rejected by Gemini: {0}")]
    CredentialRejected(String),

    #[error("network failure calling Gemini: {0}")]
    NetworkFailure(String),

    #[error("response did not match the expected shape: {0}")]
    SchemaMismatch(String),

    #[error("invalid image payload: {0}")]
    InvalidImage(String),

    #[error("analysis failed: {0}")]
    Unknown(String),
}

impl AnalysisError {
    /// Stable discriminant string used by the frontend to pick copy.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingCredential => "missing_credential",
            AnalysisError::CredentialRejected(_) => "credential_rejected",
            AnalysisError::NetworkFailure(_) => "network_failure",
            AnalysisError::SchemaMismatch(_) => "schema_mismatch",
            AnalysisError::InvalidImage(_) => "invalid_image",
            AnalysisError::Unknown(_) => "unknown",
        }
    }
}

/// Serializable form of [`AnalysisError`] returned by Tauri commands.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

impl From<AnalysisError> for ErrorPayload {
    fn from(err: AnalysisError) -> Self {
        ErrorPayload {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

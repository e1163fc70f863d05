use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in hireloop-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("filesystem error: {0}")]
    FileSystem(String),
}

/// Errors surfaced by the access gate and the interview session machine.
///
/// Every variant is recovered at the gate / state machine boundary and
/// reported back to the original caller as a structured result.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// A required field is missing, empty, or of the wrong type.
    #[error("invalid message: {0}")]
    InvalidShape(String),

    /// Admin key mismatch or unregistered applicant.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No usable delivery target for the reply.
    #[error("missing route: {0}")]
    MissingRoute(String),

    /// The responder or the session store failed.
    #[error("upstream failure: {0}")]
    UpstreamFailure(String),

    /// The outbound message could not be sent.
    #[error("delivery failure: {0}")]
    DeliveryFailure(String),
}

impl InterviewError {
    /// Machine-readable error code used in API envelopes and CLI JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidShape(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::MissingRoute(_) => "MISSING_ROUTE",
            Self::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            Self::DeliveryFailure(_) => "DELIVERY_FAILURE",
        }
    }
}

impl From<RepositoryError> for InterviewError {
    fn from(e: RepositoryError) -> Self {
        InterviewError::UpstreamFailure(format!("session store: {e}"))
    }
}

impl From<LlmError> for InterviewError {
    fn from(e: LlmError) -> Self {
        InterviewError::UpstreamFailure(format!("responder: {e}"))
    }
}

/// Errors from the applicant agent.
#[derive(Debug, Error)]
pub enum ApplicantError {
    /// The manual trigger text was not `start`.
    #[error("When you're ready to start the interview, send 'start'.")]
    NotStarted,

    #[error("reply generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("delivery failure: {0}")]
    Delivery(String),
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

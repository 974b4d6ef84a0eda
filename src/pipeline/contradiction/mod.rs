pub mod types;
pub mod annotate;
pub mod prompt;
pub mod gemini;
pub mod decoder;
pub mod sanitize;
pub mod attribution;
pub mod classify;
pub mod orchestrator;


pub use types::*;
pub use annotate::*;
pub use prompt::*;
pub use gemini::*;
pub use decoder::*;
pub use sanitize::*;
pub use attribution::*;
pub use classify::*;
pub use orchestrator::*;

use thiserror::Error;

/// Failures of the single inference call. Every variant is recovered by the
/// decoder into the canonical error Finding; none reaches the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("Inference service is not reachable at {0}")]
    Connection(String),

    #[error("Inference request timed out after {0}s")]
    Timeout(u64),

    #[error("Inference service rejected the credentials (status {0})")]
    Unauthorized(u16),

    #[error("Inference service rate limit exceeded")]
    RateLimited,

    #[error("Inference service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Inference refused by safety policy: {0}")]
    SafetyRefusal(String),

    #[error("Malformed inference envelope: {0}")]
    MalformedEnvelope(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

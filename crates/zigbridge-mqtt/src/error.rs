//! Adapter error taxonomy.
//!
//! Nothing in this crate is fatal to the process: transport errors are
//! logged and retried by the run loop, malformed payloads are dropped
//! per message, and unknown device/property/action references in
//! inbound traffic are expected skew rather than errors.

use zigbridge_core::ValidationError;

/// Result alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors surfaced by adapter operations.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// A bus publication could not be issued.
    #[error("publish to {topic} failed: {reason}")]
    Publish { topic: String, reason: String },

    /// A topic subscription could not be issued.
    #[error("subscribe to {topic} failed: {reason}")]
    Subscribe { topic: String, reason: String },

    /// Per-message parse failure; the message is dropped and the
    /// stream keeps flowing.
    #[error("malformed payload on {topic}: {reason}")]
    MalformedPayload { topic: String, reason: String },

    /// The host property base rejected a set request.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Outbound payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Action invocation named an undeclared action.
    #[error("device {device} declares no action '{action}'")]
    UnknownAction { device: String, action: String },
}

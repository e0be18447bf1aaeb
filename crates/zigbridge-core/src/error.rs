//! Errors raised by the host-side property validation step.

use serde_json::Value;

/// Why the host property base rejected a set request.
///
/// A rejected set never reaches the bus; the caller sees this error and
/// the cached property value stays unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// The property is declared read-only.
    #[error("property is read-only")]
    ReadOnly,

    /// The value's JSON type does not match the declared property type.
    #[error("expected {expected} value, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The value falls below the declared minimum.
    #[error("value {value} below minimum {minimum}")]
    BelowMinimum { value: f64, minimum: f64 },

    /// The value exceeds the declared maximum.
    #[error("value {value} above maximum {maximum}")]
    AboveMaximum { value: f64, maximum: f64 },

    /// The value is not one of the declared enum options.
    #[error("value {0} not among declared enum options")]
    NotInEnum(Value),
}

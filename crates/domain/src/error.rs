//! Unified error types for the domain layer
//!
//! The rules engine clamps and no-ops on player-data problems, so this type is
//! deliberately small: only structurally broken snapshots and parse failures
//! surface as errors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The snapshot is missing an aggregate the pipeline cannot default
    #[error("Malformed character snapshot: missing {0}")]
    MalformedSnapshot(&'static str),

    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a malformed snapshot error naming the missing aggregate.
    pub fn malformed(aggregate: &'static str) -> Self {
        Self::MalformedSnapshot(aggregate)
    }

    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for Ability {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "str" => Ok(Self::Strength),
    ///             _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

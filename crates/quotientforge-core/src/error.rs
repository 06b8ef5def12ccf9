//! Error types for QuotientForge

use thiserror::Error;

/// Main error type for QuotientForge operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuotientForgeError {
    /// Error in planner configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A per-level collection does not have one entry per level
    #[error("Level count mismatch: expected {expected} entries, got {actual}")]
    LevelCountMismatch { expected: usize, actual: usize },

    /// A state or space has the wrong dimension for its level
    #[error("Dimension mismatch on level {level}: expected {expected}, got {actual}")]
    DimensionMismatch {
        level: usize,
        expected: usize,
        actual: usize,
    },

    /// Invalid operation for current planner state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A problem description could not be projected onto a level
    #[error("Projection error: {0}")]
    Projection(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuotientForgeError {
    /// Returns true for errors caused by caller-supplied configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            QuotientForgeError::Config(_)
                | QuotientForgeError::LevelCountMismatch { .. }
                | QuotientForgeError::DimensionMismatch { .. }
                | QuotientForgeError::Projection(_)
        )
    }
}

/// Result type alias for QuotientForge operations
pub type Result<T> = std::result::Result<T, QuotientForgeError>;

//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid game record {game_id}: {reason}")]
    InvalidGame { game_id: u64, reason: String },

    #[error("Solver {model} produced a non-finite score for player {player_id}")]
    NonFiniteScore { model: String, player_id: u64 },

    #[error("Failed to persist rating results: {reason}")]
    WriteFailed { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal engine error: {message}")]
    InternalError { message: String },
}

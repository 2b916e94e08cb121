//! League Ladder - rating engine for four-player tile game leagues
//!
//! This crate converts a history of completed four-player games into
//! per-player skill scores and dense ranks under three independent models:
//! Plackett-Luce, Bradley-Terry (multiway generalization), and
//! Thurstone-Mosteller. Storage is an external concern reached through the
//! [`storage::GameRepository`] and [`storage::RatingWriter`] contracts.

pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod rank;
pub mod solver;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use engine::RatingEngine;
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use comparison::{build_comparison_graph, ComparisonSet};
pub use solver::{FitOutcome, Solver};
pub use storage::{GameRepository, RatingWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Solver configuration shared by the three rating models

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Iteration and stability settings for the model solvers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Convergence tolerance on the maximum absolute score change
    pub tolerance: f64,
    /// Iteration cap; hitting it flags the run as non-converged
    pub max_iterations: usize,
    /// Virtual win/loss weight added per player against a neutral
    /// reference opponent, keeping scores finite when a player has won
    /// (or lost) every comparison
    pub smoothing_prior: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1000,
            smoothing_prior: 0.5,
        }
    }
}

impl SolverSettings {
    /// Validate settings before handing them to a solver
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0) {
            return Err(anyhow!("Solver tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(anyhow!("Solver iteration cap must be greater than 0"));
        }
        if !(self.smoothing_prior > 0.0) {
            return Err(anyhow!("Smoothing prior must be positive"));
        }
        Ok(())
    }
}

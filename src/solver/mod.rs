//! Model solvers for the three rating systems
//!
//! Each solver is a pure function of the immutable [`ComparisonSet`]: it
//! consumes the full set of ordinal outcomes and produces one converged
//! skill estimate per included player. Solvers share the convergence policy
//! (tolerance on the maximum absolute score change, iteration cap,
//! per-iteration recentering) but differ in their likelihood models.

pub mod bradley_terry;
pub mod plackett_luce;
pub mod thurstone_mosteller;

use crate::comparison::ComparisonSet;
use crate::config::SolverSettings;
use crate::error::Result;
use crate::types::RatingModel;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use bradley_terry::BradleyTerrySolver;
pub use plackett_luce::PlackettLuceSolver;
pub use thurstone_mosteller::ThurstoneMostellerSolver;

/// Converged (or capped) fit of one model over the comparison set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitOutcome {
    pub model: RatingModel,
    /// One score per included player, indexed like
    /// [`ComparisonSet::players`]
    pub scores: Vec<f64>,
    /// False when the iteration cap was hit before tolerance was met; the
    /// scores are still the current best estimate
    pub converged: bool,
    pub iterations: usize,
    /// Maximum absolute score change at termination
    pub final_delta: f64,
}

/// Shared interface for the model solvers
pub trait Solver: Send + Sync {
    /// The model this solver fits
    fn model(&self) -> RatingModel;

    /// Fit skill scores to the full comparison set
    fn fit(&self, comparisons: &ComparisonSet) -> Result<FitOutcome>;
}

/// Construct the solver for a model; the model set is closed, so dispatch
/// is static rather than an open-ended registry
pub fn solver_for(model: RatingModel, settings: SolverSettings) -> Box<dyn Solver> {
    match model {
        RatingModel::PlackettLuce => Box::new(PlackettLuceSolver::new(settings)),
        RatingModel::BradleyTerry => Box::new(BradleyTerrySolver::new(settings)),
        RatingModel::ThurstoneMosteller => Box::new(ThurstoneMostellerSolver::new(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_dispatch_covers_all_models() {
        for model in RatingModel::ALL {
            let solver = solver_for(model, SolverSettings::default());
            assert_eq!(solver.model(), model);
        }
    }
}

//! Plackett-Luce solver
//!
//! Fits the sequential-choice ("race") likelihood: the probability of an
//! observed finishing order is the product, over finish positions, of the
//! winner's weight divided by the summed weights of the players still in
//! contention. Fitting is by Minorization-Maximization: every iteration
//! recomputes each player's weight from expected wins and exposure over all
//! of their games, a multiplicative update that monotonically improves the
//! likelihood. Scores are the logarithm of the converged weights.

use crate::comparison::ComparisonSet;
use crate::config::SolverSettings;
use crate::error::Result;
use crate::solver::{FitOutcome, Solver};
use crate::types::{RatingModel, PLAYERS_PER_GAME};
use crate::utils::{max_abs_delta, recenter};
use tracing::debug;

/// MM-based Plackett-Luce solver
#[derive(Debug, Clone)]
pub struct PlackettLuceSolver {
    settings: SolverSettings,
}

impl PlackettLuceSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// One MM sweep: returns the updated log-scores
    ///
    /// `wins[i]` counts the stages player i won (finishing 1st through 3rd
    /// each win one stage of their game); `denom[i]` accumulates, for every
    /// stage the player was still in contention, the reciprocal of the
    /// summed weights of the contenders. The smoothing prior adds half a
    /// virtual win and half a virtual loss against a unit-weight reference
    /// opponent so a player who always finished last keeps a finite weight.
    fn mm_sweep(&self, comparisons: &ComparisonSet, scores: &[f64]) -> Vec<f64> {
        let n = comparisons.player_count();
        let weights: Vec<f64> = scores.iter().map(|&s| s.exp()).collect();
        let prior = self.settings.smoothing_prior;

        let mut wins = vec![prior; n];
        let mut denom = vec![0.0; n];

        // Virtual reference games: one 0.5-weight win and one 0.5-weight
        // loss, both two-player contests against weight 1.0
        for i in 0..n {
            denom[i] += 1.0 / (weights[i] + 1.0);
        }

        for finishers in comparisons.ordered_games() {
            // Stage s: finishers[s] beats everyone still remaining
            let mut remaining_weight: f64 = finishers.iter().map(|&p| weights[p]).sum();
            for s in 0..(PLAYERS_PER_GAME - 1) {
                wins[finishers[s]] += 1.0;
                let contribution = 1.0 / remaining_weight;
                for &p in &finishers[s..] {
                    denom[p] += contribution;
                }
                remaining_weight -= weights[finishers[s]];
            }
        }

        (0..n).map(|i| (wins[i] / denom[i]).ln()).collect()
    }
}

impl Solver for PlackettLuceSolver {
    fn model(&self) -> RatingModel {
        RatingModel::PlackettLuce
    }

    fn fit(&self, comparisons: &ComparisonSet) -> Result<FitOutcome> {
        self.settings.validate()?;
        let n = comparisons.player_count();

        let mut scores = vec![0.0; n];
        let mut converged = n == 0 || comparisons.ordered_games().is_empty();
        let mut iterations = 0;
        let mut final_delta = 0.0;

        if !converged {
            for iteration in 0..self.settings.max_iterations {
                iterations = iteration + 1;
                let mut updated = self.mm_sweep(comparisons, &scores);
                recenter(&mut updated);

                final_delta = max_abs_delta(&scores, &updated);
                scores = updated;

                if final_delta < self.settings.tolerance {
                    converged = true;
                    break;
                }
            }
        }

        debug!(
            iterations,
            converged, final_delta, "plackett_luce fit finished"
        );

        Ok(FitOutcome {
            model: RatingModel::PlackettLuce,
            scores,
            converged,
            iterations,
            final_delta,
        })
    }
}

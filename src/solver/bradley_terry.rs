//! Bradley-Terry solver (multiway generalization)
//!
//! Decomposes each four-player game into its 6 implied pairwise outcomes
//! (earlier finisher beats later finisher) and fits the standard
//! Bradley-Terry model by the Zermelo/MM iteration: each player's strength
//! is recomputed from their pairwise win tally divided by a sum of inverse
//! combined strengths over every pairing they appeared in. Scores are the
//! logarithm of the converged strengths.
//!
//! The plain Zermelo iteration contracts very slowly on strongly separated
//! data (the strength ladder spans several orders of magnitude), so each
//! outer iteration applies squared extrapolation over two Zermelo sweeps
//! (SQUAREM scheme S3), followed by a stabilizing sweep. The fixed point is
//! unchanged; the linear tail is what gets skipped.
//!
//! A player who lost every pairwise comparison would otherwise converge to
//! strength zero (log score diverging), so every player carries half a
//! virtual win and half a virtual loss against a unit-strength reference
//! opponent, the usual Bayesian smoothing.

use crate::comparison::ComparisonSet;
use crate::config::SolverSettings;
use crate::error::Result;
use crate::solver::{FitOutcome, Solver};
use crate::types::RatingModel;
use crate::utils::{max_abs_delta, recenter};
use tracing::debug;

/// Extrapolated scores are clamped to this magnitude so their exponentials
/// stay finite before the stabilizing sweep
const MAX_SCORE: f64 = 50.0;

/// Zermelo/MM Bradley-Terry solver over pairwise decompositions
#[derive(Debug, Clone)]
pub struct BradleyTerrySolver {
    settings: SolverSettings,
}

impl BradleyTerrySolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// One Zermelo sweep: recompute every strength from the win tally and
    /// the current inverse combined strengths, recentered, in log space
    ///
    /// `denom[i]` is the sum over i's pairings of `1 / (pi_i + pi_j)`, plus
    /// the two 0.5-weight reference games against strength 1.
    fn zermelo_sweep(
        &self,
        outcomes: &[(usize, usize)],
        wins: &[f64],
        scores: &[f64],
    ) -> Vec<f64> {
        let strengths: Vec<f64> = scores.iter().map(|&s| s.exp()).collect();

        let mut denom: Vec<f64> = strengths.iter().map(|&p| 1.0 / (p + 1.0)).collect();
        for &(a, b) in outcomes {
            let c = 1.0 / (strengths[a] + strengths[b]);
            denom[a] += c;
            denom[b] += c;
        }

        let mut updated: Vec<f64> = wins
            .iter()
            .zip(denom.iter())
            .map(|(w, d)| (w / d).ln())
            .collect();
        recenter(&mut updated);
        updated
    }

    /// Squared extrapolation over two Zermelo sweeps
    ///
    /// With `r = first - current` and `v = (second - first) - r`, jumps to
    /// `current - 2*a*r + a^2*v` where `a = -|r|/|v|` (clamped so the step
    /// never falls short of the plain two-sweep update), then runs one
    /// stabilizing sweep so the result is always a genuine MM iterate.
    fn extrapolate(
        &self,
        outcomes: &[(usize, usize)],
        wins: &[f64],
        current: &[f64],
        first: &[f64],
        second: &[f64],
    ) -> Vec<f64> {
        let n = current.len();
        let r: Vec<f64> = (0..n).map(|i| first[i] - current[i]).collect();
        let v: Vec<f64> = (0..n).map(|i| second[i] - first[i] - r[i]).collect();

        let r_norm = r.iter().map(|x| x * x).sum::<f64>().sqrt();
        let v_norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if v_norm < 1e-12 {
            return second.to_vec();
        }

        let alpha = (-(r_norm / v_norm)).min(-1.0);
        let jumped: Vec<f64> = (0..n)
            .map(|i| {
                (current[i] - 2.0 * alpha * r[i] + alpha * alpha * v[i])
                    .clamp(-MAX_SCORE, MAX_SCORE)
            })
            .collect();

        self.zermelo_sweep(outcomes, wins, &jumped)
    }
}

impl Solver for BradleyTerrySolver {
    fn model(&self) -> RatingModel {
        RatingModel::BradleyTerry
    }

    fn fit(&self, comparisons: &ComparisonSet) -> Result<FitOutcome> {
        self.settings.validate()?;
        let n = comparisons.player_count();
        let outcomes = comparisons.pairwise_outcomes();
        let prior = self.settings.smoothing_prior;

        let mut wins = vec![prior; n];
        for &(winner, _) in &outcomes {
            wins[winner] += 1.0;
        }

        let mut scores = vec![0.0f64; n];
        let mut converged = n == 0 || outcomes.is_empty();
        let mut iterations = 0;
        let mut final_delta = 0.0;

        if !converged {
            for iteration in 0..self.settings.max_iterations {
                iterations = iteration + 1;

                let first = self.zermelo_sweep(&outcomes, &wins, &scores);
                let second = self.zermelo_sweep(&outcomes, &wins, &first);
                let updated = self.extrapolate(&outcomes, &wins, &scores, &first, &second);

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
            converged, final_delta, "bradley_terry fit finished"
        );

        Ok(FitOutcome {
            model: RatingModel::BradleyTerry,
            scores,
            converged,
            iterations,
            final_delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::build_comparison_graph;
    use crate::types::Game;
    use crate::utils::current_timestamp;
    use std::collections::BTreeSet;

    fn comparisons_from(orders: &[[u8; 4]]) -> ComparisonSet {
        let games: Vec<Game> = orders
            .iter()
            .enumerate()
            .map(|(i, &order)| {
                Game::new(i as u64, [1, 2, 3, 4], order, current_timestamp())
            })
            .collect();
        build_comparison_graph(&games, &BTreeSet::new())
            .unwrap()
            .comparisons
    }

    #[test]
    fn test_clear_total_order_recovered() {
        let comparisons = comparisons_from(&vec![[1, 2, 3, 4]; 50]);
        let fit = BradleyTerrySolver::new(SolverSettings::default())
            .fit(&comparisons)
            .unwrap();

        assert!(fit.converged, "final delta {}", fit.final_delta);
        assert!(fit.scores.iter().all(|s| s.is_finite()));
        assert!(fit.scores[0] > fit.scores[1]);
        assert!(fit.scores[1] > fit.scores[2]);
        assert!(fit.scores[2] > fit.scores[3]);
    }

    #[test]
    fn test_separated_data_converges_well_inside_cap() {
        // Fully separated history: the strength ladder spans orders of
        // magnitude and the unaccelerated iteration stalls around 1e-5
        // after 1000 sweeps. The extrapolated fit must come in far below
        // the cap at the default tolerance.
        let settings = SolverSettings::default();
        let comparisons = comparisons_from(&vec![[1, 2, 3, 4]; 50]);
        let fit = BradleyTerrySolver::new(settings)
            .fit(&comparisons)
            .unwrap();

        assert!(fit.converged);
        assert!(
            fit.iterations < settings.max_iterations / 2,
            "took {} iterations",
            fit.iterations
        );
        assert!(fit.final_delta < settings.tolerance);
    }

    #[test]
    fn test_zero_win_player_finite() {
        // Player 4 loses all 3 pairwise comparisons in every game; the
        // smoothing prior keeps the strength bounded away from zero
        let comparisons = comparisons_from(&vec![[1, 2, 3, 4]; 200]);
        let fit = BradleyTerrySolver::new(SolverSettings::default())
            .fit(&comparisons)
            .unwrap();
        assert!(fit.scores[3].is_finite());
        assert!(!fit.scores[3].is_nan());
        assert!(fit.scores[3] < fit.scores[2]);
    }

    #[test]
    fn test_symmetric_histories_give_equal_scores() {
        let comparisons = comparisons_from(&[
            [1, 2, 3, 4],
            [2, 3, 4, 1],
            [3, 4, 1, 2],
            [4, 1, 2, 3],
        ]);
        let fit = BradleyTerrySolver::new(SolverSettings::default())
            .fit(&comparisons)
            .unwrap();
        for &s in &fit.scores {
            assert!(s.abs() < 1e-6);
        }
    }

    #[test]
    fn test_mostly_better_player_ranked_higher() {
        // finish_order is seat-aligned: [2, 1, 3, 4] means player 2 won.
        // Player 2 wins 3 of 4 games against the same table.
        let comparisons = comparisons_from(&[
            [2, 1, 3, 4],
            [2, 1, 3, 4],
            [2, 1, 3, 4],
            [1, 2, 3, 4],
        ]);
        let fit = BradleyTerrySolver::new(SolverSettings::default())
            .fit(&comparisons)
            .unwrap();
        assert!(fit.scores[1] > fit.scores[0]);
        assert!(fit.scores[0] > fit.scores[2]);
    }

    #[test]
    fn test_reversed_orders_reverse_ranking() {
        let forward = comparisons_from(&vec![[1, 2, 3, 4]; 30]);
        let reversed = comparisons_from(&vec![[4, 3, 2, 1]; 30]);
        let solver = BradleyTerrySolver::new(SolverSettings::default());

        let fit_f = solver.fit(&forward).unwrap();
        let fit_r = solver.fit(&reversed).unwrap();

        assert!(fit_f.scores[0] > fit_f.scores[3]);
        assert!(fit_r.scores[3] > fit_r.scores[0]);
    }

    #[test]
    fn test_determinism() {
        let comparisons = comparisons_from(&vec![[1, 3, 2, 4]; 20]);
        let solver = BradleyTerrySolver::new(SolverSettings::default());
        let a = solver.fit(&comparisons).unwrap();
        let b = solver.fit(&comparisons).unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_empty_comparisons_converges_trivially() {
        let comparisons = comparisons_from(&[]);
        let fit = BradleyTerrySolver::new(SolverSettings::default())
            .fit(&comparisons)
            .unwrap();
        assert!(fit.converged);
        assert!(fit.scores.is_empty());
    }
}

//! Thurstone-Mosteller solver
//!
//! Models each player's performance as a normal variable with the player's
//! skill as mean and fixed shared variance; the probability one player
//! outperforms another is the standard normal CDF of the scaled skill
//! difference. Each four-player game contributes its 6 pairwise outcomes,
//! and skills are fitted by damped diagonal Newton updates on the pairwise
//! probit log-likelihood.
//!
//! Like the other solvers, every player carries half a virtual win and half
//! a virtual loss against a zero-skill reference opponent so fully
//! separated data still has a finite maximizer.

use crate::comparison::ComparisonSet;
use crate::config::SolverSettings;
use crate::error::Result;
use crate::solver::{FitOutcome, Solver};
use crate::types::RatingModel;
use crate::utils::{max_abs_delta, recenter};
use tracing::debug;

/// Two independent unit-variance performances: difference has variance 2
const DIFF_SCALE: f64 = std::f64::consts::SQRT_2;

/// Newton steps are clamped to this magnitude per iteration; the diagonal
/// approximation ignores cross terms and can otherwise overshoot
const MAX_STEP: f64 = 1.0;

/// Skill differences are clamped before evaluating the probit terms; beyond
/// this the hazard function is effectively linear and the clamp only guards
/// against loss of precision in the CDF tail
const MAX_DIFF: f64 = 8.0;

/// Probit-likelihood Thurstone-Mosteller solver
#[derive(Debug, Clone)]
pub struct ThurstoneMostellerSolver {
    settings: SolverSettings,
}

impl ThurstoneMostellerSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

/// Standard normal probability density
fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Error function, Abramowitz & Stegun 7.1.26 (max error ~1.5e-7)
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + 0.3275911 * x);
    let y = 1.0
        - (((((1.061405429 * t - 1.453152027) * t) + 1.421413741) * t - 0.284496736) * t
            + 0.254829592)
            * t
            * (-x * x).exp();

    sign * y
}

/// Standard normal cumulative distribution function
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Inverse Mills ratio v(t) = pdf(t) / cdf(t): the gradient of ln(cdf)
fn hazard(t: f64) -> f64 {
    let t = t.clamp(-MAX_DIFF, MAX_DIFF);
    normal_pdf(t) / normal_cdf(t).max(1e-12)
}

/// Curvature term w(t) = v(t) * (v(t) + t), in (0, 1)
fn curvature(t: f64) -> f64 {
    let t = t.clamp(-MAX_DIFF, MAX_DIFF);
    let v = hazard(t);
    v * (v + t)
}

impl Solver for ThurstoneMostellerSolver {
    fn model(&self) -> RatingModel {
        RatingModel::ThurstoneMosteller
    }

    fn fit(&self, comparisons: &ComparisonSet) -> Result<FitOutcome> {
        self.settings.validate()?;
        let n = comparisons.player_count();
        let outcomes = comparisons.pairwise_outcomes();
        let prior = self.settings.smoothing_prior;

        let mut scores = vec![0.0; n];
        let mut converged = n == 0 || outcomes.is_empty();
        let mut iterations = 0;
        let mut final_delta = 0.0;

        if !converged {
            for iteration in 0..self.settings.max_iterations {
                iterations = iteration + 1;

                let mut gradient = vec![0.0; n];
                let mut hessian = vec![0.0; n];

                // Reference games: 0.5-weight win and 0.5-weight loss
                // against skill 0
                for i in 0..n {
                    let t = scores[i] / DIFF_SCALE;
                    gradient[i] += prior * (hazard(t) - hazard(-t)) / DIFF_SCALE;
                    hessian[i] +=
                        prior * (curvature(t) + curvature(-t)) / (DIFF_SCALE * DIFF_SCALE);
                }

                for &(winner, loser) in &outcomes {
                    let d = (scores[winner] - scores[loser]) / DIFF_SCALE;
                    let v = hazard(d);
                    let w = curvature(d);
                    gradient[winner] += v / DIFF_SCALE;
                    gradient[loser] -= v / DIFF_SCALE;
                    hessian[winner] += w / (DIFF_SCALE * DIFF_SCALE);
                    hessian[loser] += w / (DIFF_SCALE * DIFF_SCALE);
                }

                let mut updated: Vec<f64> = (0..n)
                    .map(|i| {
                        let step = (gradient[i] / hessian[i].max(1e-12))
                            .clamp(-MAX_STEP, MAX_STEP);
                        scores[i] + step
                    })
                    .collect();
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
            converged, final_delta, "thurstone_mosteller fit finished"
        );

        Ok(FitOutcome {
            model: RatingModel::ThurstoneMosteller,
            scores,
            converged,
            iterations,
            final_delta,
        })
    }
}

//! Rating run orchestration
//!
//! One run is a pure pipeline over an immutable snapshot: fetch the full
//! game history and roster up front, build the comparison graph, fit the
//! three models as independent blocking tasks, derive dense ranks per
//! model, and hand the finished results to the writer in a single atomic
//! call. Runs share no state; repeating a run over the same history yields
//! identical results.

use crate::comparison::build_comparison_graph;
use crate::config::AppConfig;
use crate::error::{RatingError, Result};
use crate::rank::derive_ranks;
use crate::solver::{solver_for, FitOutcome};
use crate::storage::{GameRepository, RatingWriter};
use crate::types::{ModelRunStats, RatingModel, RatingResult, RatingRunReport, RunWarning};
use crate::utils::{current_timestamp, generate_run_id};
use std::sync::Arc;
use tracing::{info, warn};

/// The rating engine: ties the storage boundaries to the solver pipeline
pub struct RatingEngine {
    config: AppConfig,
    repository: Arc<dyn GameRepository>,
    writer: Arc<dyn RatingWriter>,
}

impl RatingEngine {
    pub fn new(
        config: AppConfig,
        repository: Arc<dyn GameRepository>,
        writer: Arc<dyn RatingWriter>,
    ) -> Result<Self> {
        crate::config::validate_config(&config)?;
        Ok(Self {
            config,
            repository,
            writer,
        })
    }

    /// Execute one complete rating run
    ///
    /// Fatal errors (malformed games, solver defects, failed writes) abort
    /// the run; disconnected pools and non-convergence are surfaced as
    /// warnings on the returned report.
    pub async fn run(&self) -> Result<RatingRunReport> {
        let run_id = generate_run_id();
        let started_at = current_timestamp();

        let games = self.repository.fetch_all_games().await?;
        let roster = self.repository.fetch_all_players().await?;
        info!(%run_id, games = games.len(), roster = roster.len(), "starting rating run");

        let graph = build_comparison_graph(&games, &roster)?;
        let mut warnings = graph.warnings.clone();
        let comparisons = Arc::new(graph.comparisons);
        let games_rated = comparisons.ordered_games().len();

        // The three solvers are pure functions of the same immutable
        // comparison set; run them on the blocking pool and join
        let settings = self.config.solver;
        let handles: Vec<_> = RatingModel::ALL
            .into_iter()
            .map(|model| {
                let comparisons = Arc::clone(&comparisons);
                tokio::task::spawn_blocking(move || {
                    solver_for(model, settings).fit(&comparisons)
                })
            })
            .collect();

        let mut fits: Vec<FitOutcome> = Vec::with_capacity(handles.len());
        for handle in handles {
            let fit = handle.await.map_err(|e| RatingError::InternalError {
                message: format!("solver task panicked: {e}"),
            })??;
            fits.push(fit);
        }

        let mut results = Vec::new();
        let mut model_stats = Vec::new();
        for fit in &fits {
            if !fit.converged {
                warn!(
                    model = %fit.model,
                    iterations = fit.iterations,
                    final_delta = fit.final_delta,
                    "solver hit iteration cap before tolerance"
                );
                warnings.push(RunWarning::NonConvergence {
                    model: fit.model,
                    iterations: fit.iterations,
                    final_delta: fit.final_delta,
                });
            }
            model_stats.push(ModelRunStats {
                model: fit.model,
                converged: fit.converged,
                iterations: fit.iterations,
                final_delta: fit.final_delta,
            });

            let ranked = derive_ranks(fit.model, comparisons.players(), &fit.scores)?;
            results.extend(ranked.into_iter().map(|r| RatingResult {
                player_id: r.player_id,
                model: fit.model,
                score: r.score,
                rank: r.rank,
            }));
        }

        self.writer.write_ratings(results).await?;

        info!(
            %run_id,
            included = comparisons.player_count(),
            excluded = graph.excluded_players.len(),
            warnings = warnings.len(),
            "rating run complete"
        );

        Ok(RatingRunReport {
            run_id,
            started_at,
            games_rated,
            included_players: comparisons.players().to_vec(),
            excluded_players: graph.excluded_players,
            model_stats,
            warnings,
        })
    }
}

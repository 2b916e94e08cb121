//! Common types used throughout the rating engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = u64;

/// Unique identifier for games
pub type GameId = u64;

/// Unique identifier for a single rating run
pub type RunId = Uuid;

/// Number of seats in a game; the engine only rates full tables
pub const PLAYERS_PER_GAME: usize = 4;

/// The closed set of rating models the engine computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingModel {
    PlackettLuce,
    BradleyTerry,
    ThurstoneMosteller,
}

impl RatingModel {
    /// All models, in the order results are reported
    pub const ALL: [RatingModel; 3] = [
        RatingModel::PlackettLuce,
        RatingModel::BradleyTerry,
        RatingModel::ThurstoneMosteller,
    ];
}

impl std::fmt::Display for RatingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingModel::PlackettLuce => write!(f, "plackett_luce"),
            RatingModel::BradleyTerry => write!(f, "bradley_terry"),
            RatingModel::ThurstoneMosteller => write!(f, "thurstone_mosteller"),
        }
    }
}

/// A completed four-player game with its ordinal finishing order
///
/// `finish_order[i]` is the finishing position (1 = winner, 4 = last) of
/// `players[i]`. Tournament and club references are opaque provenance from
/// the record store; the solvers never read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub players: [PlayerId; PLAYERS_PER_GAME],
    pub finish_order: [u8; PLAYERS_PER_GAME],
    pub played_at: DateTime<Utc>,
    pub tournament_id: Option<u64>,
    pub club_id: Option<u64>,
}

impl Game {
    /// Convenience constructor for non-tournament games
    pub fn new(
        id: GameId,
        players: [PlayerId; PLAYERS_PER_GAME],
        finish_order: [u8; PLAYERS_PER_GAME],
        played_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            players,
            finish_order,
            played_at,
            tournament_id: None,
            club_id: None,
        }
    }
}

/// Final output tuple for one (player, model) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    pub player_id: PlayerId,
    pub model: RatingModel,
    pub score: f64,
    /// Dense rank, 1 = best
    pub rank: u32,
}

/// Non-fatal conditions surfaced by a rating run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunWarning {
    /// The player pool is not fully connected; the listed players were
    /// excluded from this run because their component cannot be jointly
    /// calibrated with the majority component.
    DisconnectedPlayers { excluded: Vec<PlayerId> },
    /// A solver hit its iteration cap before reaching tolerance. The
    /// current estimate was still used.
    NonConvergence {
        model: RatingModel,
        iterations: usize,
        final_delta: f64,
    },
}

/// Per-model convergence bookkeeping for a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelRunStats {
    pub model: RatingModel,
    pub converged: bool,
    pub iterations: usize,
    pub final_delta: f64,
}

/// Summary of one complete rating run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub games_rated: usize,
    /// Players that received a score and rank under every model
    pub included_players: Vec<PlayerId>,
    /// Players with zero games or in a minority component; the storage
    /// layer should null their score/rank columns
    pub excluded_players: Vec<PlayerId>,
    pub model_stats: Vec<ModelRunStats>,
    pub warnings: Vec<RunWarning>,
}

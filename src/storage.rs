//! External storage boundary contracts
//!
//! The engine treats persistence as a passive record store behind two
//! traits: a read contract for the game history and player roster, and a
//! write contract for finished rating results. The write must be atomic
//! from the engine's perspective. An in-memory implementation backs tests
//! and benches.

use crate::error::{RatingError, Result};
use crate::types::{Game, PlayerId, RatingResult};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

/// Read access to the historical game records and the player roster
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Every completed game, in recorded order
    async fn fetch_all_games(&self) -> Result<Vec<Game>>;

    /// The full player roster, including players with zero games
    async fn fetch_all_players(&self) -> Result<BTreeSet<PlayerId>>;
}

/// Write access for finished rating results
///
/// Called exactly once per run with one entry per (included player, model)
/// pair. Implementations must apply all results or none.
#[async_trait]
pub trait RatingWriter: Send + Sync {
    async fn write_ratings(&self, results: Vec<RatingResult>) -> Result<()>;
}

/// In-memory store implementing both contracts, for tests and benches
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: RwLock<Vec<Game>>,
    players: RwLock<BTreeSet<PlayerId>>,
    written: RwLock<Vec<Vec<RatingResult>>>,
    fail_writes: RwLock<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a game; its players are added to the roster automatically
    pub async fn add_game(&self, game: Game) {
        self.players.write().await.extend(game.players);
        self.games.write().await.push(game);
    }

    /// Add a roster player without any games
    pub async fn add_player(&self, player_id: PlayerId) {
        self.players.write().await.insert(player_id);
    }

    /// Make subsequent `write_ratings` calls fail (for failure-path tests)
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    /// All write batches received so far
    pub async fn written_batches(&self) -> Vec<Vec<RatingResult>> {
        self.written.read().await.clone()
    }
}

#[async_trait]
impl GameRepository for InMemoryStore {
    async fn fetch_all_games(&self) -> Result<Vec<Game>> {
        Ok(self.games.read().await.clone())
    }

    async fn fetch_all_players(&self) -> Result<BTreeSet<PlayerId>> {
        Ok(self.players.read().await.clone())
    }
}

#[async_trait]
impl RatingWriter for InMemoryStore {
    async fn write_ratings(&self, results: Vec<RatingResult>) -> Result<()> {
        if *self.fail_writes.read().await {
            return Err(RatingError::WriteFailed {
                reason: "write failure injected by test".to_string(),
            }
            .into());
        }
        self.written.write().await.push(results);
        Ok(())
    }
}

//! Shared fixtures for integration tests

use league_ladder::config::AppConfig;
use league_ladder::engine::RatingEngine;
use league_ladder::storage::InMemoryStore;
use league_ladder::types::{Game, PlayerId, RatingModel, RatingResult};
use league_ladder::utils::current_timestamp;
use std::collections::HashMap;
use std::sync::Arc;

/// Build a game with an explicit seat-aligned finishing order
pub fn game(id: u64, players: [PlayerId; 4], finish_order: [u8; 4]) -> Game {
    Game::new(id, players, finish_order, current_timestamp())
}

/// Seed `count` games where the table always finishes in seat order
/// (first listed player wins, last listed player comes last)
pub async fn seed_consistent_series(
    store: &InMemoryStore,
    players: [PlayerId; 4],
    count: u64,
    first_game_id: u64,
) {
    for i in 0..count {
        store
            .add_game(game(first_game_id + i, players, [1, 2, 3, 4]))
            .await;
    }
}

/// Engine wired to a single in-memory store for both boundaries
pub fn engine_over(store: Arc<InMemoryStore>) -> RatingEngine {
    league_ladder::utils::init_logging("warn");
    RatingEngine::new(AppConfig::default(), store.clone(), store).unwrap()
}

/// Index one written batch as (player, model) -> result
pub fn index_results(
    batch: &[RatingResult],
) -> HashMap<(PlayerId, RatingModel), RatingResult> {
    batch
        .iter()
        .map(|r| ((r.player_id, r.model), r.clone()))
        .collect()
}

/// Player ids of one model's results ordered by rank (1 first)
pub fn rank_order(batch: &[RatingResult], model: RatingModel) -> Vec<PlayerId> {
    let mut entries: Vec<&RatingResult> =
        batch.iter().filter(|r| r.model == model).collect();
    entries.sort_by_key(|r| r.rank);
    entries.iter().map(|r| r.player_id).collect()
}

//! Comparison graph building and validation
//!
//! Expands the raw game history into the canonical structure the model
//! solvers consume: for each game, the four participants ordered by finish
//! position (best first), over a dense index of included players. Also
//! computes the undirected connectivity graph among players and excludes
//! minority components, since none of the models can jointly calibrate
//! skills across disconnected player pools.

use crate::error::{RatingError, Result};
use crate::types::{Game, PlayerId, RunWarning, PLAYERS_PER_GAME};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Canonical per-run comparison structure shared by all three solvers
///
/// Players are indexed densely in ascending id order; every game is stored
/// as participant indices ordered best-first. Immutable once built.
#[derive(Debug, Clone)]
pub struct ComparisonSet {
    players: Vec<PlayerId>,
    index: BTreeMap<PlayerId, usize>,
    games: Vec<[usize; PLAYERS_PER_GAME]>,
}

impl ComparisonSet {
    /// Number of included players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Included player ids in ascending order; position equals solver index
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Dense index of a player id, if included
    pub fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.index.get(&player_id).copied()
    }

    /// Per-game participant indices ordered by finish position, best first
    pub fn ordered_games(&self) -> &[[usize; PLAYERS_PER_GAME]] {
        &self.games
    }

    /// Decompose every game into its implied pairwise outcomes
    ///
    /// Each four-player game yields 6 `(winner, loser)` index pairs, one for
    /// every pair of participants. Used by the Bradley-Terry and
    /// Thurstone-Mosteller solvers.
    pub fn pairwise_outcomes(&self) -> Vec<(usize, usize)> {
        let mut outcomes = Vec::with_capacity(self.games.len() * 6);
        for finishers in &self.games {
            for i in 0..PLAYERS_PER_GAME {
                for j in (i + 1)..PLAYERS_PER_GAME {
                    outcomes.push((finishers[i], finishers[j]));
                }
            }
        }
        outcomes
    }

    /// Number of games each included player participated in
    pub fn games_per_player(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.players.len()];
        for finishers in &self.games {
            for &idx in finishers {
                counts[idx] += 1;
            }
        }
        counts
    }
}

/// Output of the graph builder: the comparison set plus exclusion bookkeeping
#[derive(Debug, Clone)]
pub struct ComparisonGraph {
    pub comparisons: ComparisonSet,
    /// Roster players left out of this run: zero recorded games, or members
    /// of a minority connected component
    pub excluded_players: Vec<PlayerId>,
    pub warnings: Vec<RunWarning>,
}

/// Validate a single game record against the data-model invariants
fn validate_game(game: &Game) -> Result<()> {
    let distinct: BTreeSet<PlayerId> = game.players.iter().copied().collect();
    if distinct.len() != PLAYERS_PER_GAME {
        return Err(RatingError::InvalidGame {
            game_id: game.id,
            reason: format!("expected 4 distinct players, got {:?}", game.players),
        }
        .into());
    }

    let mut seen = [false; PLAYERS_PER_GAME];
    for &pos in &game.finish_order {
        if !(1..=PLAYERS_PER_GAME as u8).contains(&pos) || seen[(pos - 1) as usize] {
            return Err(RatingError::InvalidGame {
                game_id: game.id,
                reason: format!(
                    "finish order {:?} is not a permutation of 1..=4",
                    game.finish_order
                ),
            }
            .into());
        }
        seen[(pos - 1) as usize] = true;
    }

    Ok(())
}

/// Union-find over player ids for connectivity analysis
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    // Two-pass iterative find with path compression; a chain-shaped pool
    // can be as deep as the player count, so no recursion
    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Build the comparison graph for one rating run
///
/// Validates every game (fatal on malformed records), determines the
/// majority connected component, and produces the canonical comparison set
/// over that component. `roster` is the full player set from the repository;
/// players with zero valid games are excluded, never defaulted.
pub fn build_comparison_graph(
    games: &[Game],
    roster: &BTreeSet<PlayerId>,
) -> Result<ComparisonGraph> {
    for game in games {
        validate_game(game)?;
    }

    // Players that actually appear in the history, in ascending id order
    let mut active: BTreeSet<PlayerId> = BTreeSet::new();
    for game in games {
        active.extend(game.players.iter().copied());
    }
    let active: Vec<PlayerId> = active.into_iter().collect();
    let active_index: BTreeMap<PlayerId, usize> = active
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    // Edge between every pair of players that ever shared a table
    let mut sets = DisjointSets::new(active.len());
    for game in games {
        let first = active_index[&game.players[0]];
        for &p in &game.players[1..] {
            sets.union(first, active_index[&p]);
        }
    }

    // Group players by component root
    let mut components: BTreeMap<usize, Vec<PlayerId>> = BTreeMap::new();
    for (i, &player) in active.iter().enumerate() {
        components.entry(sets.find(i)).or_default().push(player);
    }

    // Majority component; ties resolved toward the component containing the
    // smallest player id (members are already ascending, components are
    // keyed deterministically)
    let included: BTreeSet<PlayerId> = components
        .values()
        .max_by(|a, b| a.len().cmp(&b.len()).then(b[0].cmp(&a[0])))
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .collect();

    let mut warnings = Vec::new();
    let mut excluded: Vec<PlayerId> = active
        .iter()
        .copied()
        .filter(|p| !included.contains(p))
        .collect();

    if !excluded.is_empty() {
        warn!(
            excluded = excluded.len(),
            "player pool is not fully connected; excluding minority components"
        );
        warnings.push(RunWarning::DisconnectedPlayers {
            excluded: excluded.clone(),
        });
    }

    // Roster players that never played any game are excluded as well, but
    // do not constitute a connectivity warning
    for &player in roster {
        if !active_index.contains_key(&player) {
            excluded.push(player);
        }
    }
    excluded.sort_unstable();
    excluded.dedup();

    let players: Vec<PlayerId> = included.iter().copied().collect();
    let index: BTreeMap<PlayerId, usize> = players
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    // Order each included game's participants best-first
    let mut ordered_games = Vec::with_capacity(games.len());
    for game in games {
        if !index.contains_key(&game.players[0]) {
            continue; // whole game lies in an excluded component
        }
        let mut finishers = [0usize; PLAYERS_PER_GAME];
        for (seat, &pos) in game.finish_order.iter().enumerate() {
            finishers[(pos - 1) as usize] = index[&game.players[seat]];
        }
        ordered_games.push(finishers);
    }

    Ok(ComparisonGraph {
        comparisons: ComparisonSet {
            players,
            index,
            games: ordered_games,
        },
        excluded_players: excluded,
        warnings,
    })
}

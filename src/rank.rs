//! Rank derivation from converged score vectors
//!
//! Converts one model's scores over the included player set into dense
//! integer ranks starting at 1, best score first. Exactly-equal scores are
//! ordered by ascending player id so every run yields the same reproducible
//! total order; because the tie-break is total, ranks are never shared.

use crate::error::{RatingError, Result};
use crate::types::{PlayerId, RatingModel};

/// A player's derived rank alongside the score it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore {
    pub player_id: PlayerId,
    pub score: f64,
    /// Dense rank, 1 = best
    pub rank: u32,
}

/// Derive dense ranks for one model's scores
///
/// `players` and `scores` are parallel slices in comparison-set order.
/// Fails with [`RatingError::NonFiniteScore`] if any score is NaN or
/// infinite; a non-finite score is a solver defect and must never be
/// persisted.
pub fn derive_ranks(
    model: RatingModel,
    players: &[PlayerId],
    scores: &[f64],
) -> Result<Vec<RankedScore>> {
    debug_assert_eq!(players.len(), scores.len());

    for (&player_id, &score) in players.iter().zip(scores.iter()) {
        if !score.is_finite() {
            return Err(RatingError::NonFiniteScore {
                model: model.to_string(),
                player_id,
            }
            .into());
        }
    }

    let mut ordered: Vec<(PlayerId, f64)> = players
        .iter()
        .copied()
        .zip(scores.iter().copied())
        .collect();

    // Descending score, then ascending id; scores are finite so the
    // comparison is total
    ordered.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(i, (player_id, score))| RankedScore {
            player_id,
            score,
            rank: (i + 1) as u32,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_descending_score_order() {
        let ranked = derive_ranks(
            RatingModel::PlackettLuce,
            &[10, 20, 30],
            &[-0.5, 1.2, 0.3],
        )
        .unwrap();

        assert_eq!(ranked[0].player_id, 20);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].player_id, 30);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].player_id, 10);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_equal_scores_break_by_ascending_id() {
        let ranked = derive_ranks(
            RatingModel::BradleyTerry,
            &[42, 7, 13],
            &[0.0, 0.0, 0.0],
        )
        .unwrap();

        assert_eq!(ranked[0].player_id, 7);
        assert_eq!(ranked[1].player_id, 13);
        assert_eq!(ranked[2].player_id, 42);
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_nan_score_rejected() {
        let result = derive_ranks(
            RatingModel::ThurstoneMosteller,
            &[1, 2],
            &[0.5, f64::NAN],
        );
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::NonFiniteScore { player_id: 2, .. })
        ));
    }

    #[test]
    fn test_infinite_score_rejected() {
        assert!(derive_ranks(
            RatingModel::PlackettLuce,
            &[1, 2],
            &[f64::INFINITY, 0.0]
        )
        .is_err());
    }

    #[test]
    fn test_empty_input() {
        let ranked = derive_ranks(RatingModel::PlackettLuce, &[], &[]).unwrap();
        assert!(ranked.is_empty());
    }

    proptest! {
        #[test]
        fn prop_ranks_are_dense_and_unique(
            scores in prop::collection::vec(-100.0f64..100.0, 1..40)
        ) {
            let players: Vec<PlayerId> = (1..=scores.len() as u64).collect();
            let ranked =
                derive_ranks(RatingModel::BradleyTerry, &players, &scores).unwrap();

            let mut ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
            ranks.sort_unstable();
            let expected: Vec<u32> = (1..=scores.len() as u32).collect();
            prop_assert_eq!(ranks, expected);
        }

        #[test]
        fn prop_rank_order_respects_scores(
            scores in prop::collection::vec(-100.0f64..100.0, 2..40)
        ) {
            let players: Vec<PlayerId> = (1..=scores.len() as u64).collect();
            let ranked =
                derive_ranks(RatingModel::PlackettLuce, &players, &scores).unwrap();

            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].player_id < pair[1].player_id);
                }
            }
        }

        #[test]
        fn prop_translation_preserves_rank_order(
            raw in prop::collection::vec(-500i32..500, 1..30),
            shift_raw in -100i32..100
        ) {
            // Quantized scores so the shift can never create or destroy ties
            let scores: Vec<f64> = raw.iter().map(|&s| s as f64 / 8.0).collect();
            let shift = shift_raw as f64 / 8.0;
            let players: Vec<PlayerId> = (1..=scores.len() as u64).collect();
            let shifted: Vec<f64> = scores.iter().map(|s| s + shift).collect();

            let base =
                derive_ranks(RatingModel::BradleyTerry, &players, &scores).unwrap();
            let moved =
                derive_ranks(RatingModel::BradleyTerry, &players, &shifted).unwrap();

            let base_order: Vec<PlayerId> =
                base.iter().map(|r| r.player_id).collect();
            let moved_order: Vec<PlayerId> =
                moved.iter().map(|r| r.player_id).collect();
            prop_assert_eq!(base_order, moved_order);
        }
    }
}

//! Property-based tests for the Elo rating engine

use club_ladder::rating::{expected_score, update_ratings};
use proptest::prelude::*;

const MIN_RATING: i32 = -10_000;
const MAX_RATING: i32 = 10_000;

proptest! {
    #[test]
    fn expected_score_stays_in_open_interval(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        let e = expected_score(a as f64, b as f64);
        prop_assert!(e > 0.0 && e < 1.0, "expected_score({}, {}) = {}", a, b, e);
    }

    #[test]
    fn expected_scores_sum_to_one(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        let sum = expected_score(a as f64, b as f64) + expected_score(b as f64, a as f64);
        prop_assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn equal_ratings_expect_exactly_half(a in MIN_RATING..MAX_RATING) {
        prop_assert_eq!(expected_score(a as f64, a as f64), 0.5);
    }

    #[test]
    fn expected_score_strictly_increases_with_own_rating(
        a in (MIN_RATING + 1)..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        let lower = expected_score((a - 1) as f64, b as f64);
        let higher = expected_score(a as f64, b as f64);
        prop_assert!(higher > lower);
    }

    #[test]
    fn update_deltas_almost_cancel(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
        score in prop::sample::select(vec![0.0, 0.5, 1.0]),
    ) {
        let (new_a, new_b) = update_ratings(a, b, score, 32.0);
        let moved = (new_a - a) + (new_b - b);
        // Each side rounds independently, so the sum can be off by one point
        prop_assert!(moved.abs() <= 1, "net movement was {}", moved);
    }

    #[test]
    fn winner_never_loses_points(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        let (new_a, new_b) = update_ratings(a, b, 1.0, 32.0);
        prop_assert!(new_a >= a);
        prop_assert!(new_b <= b);
    }

    #[test]
    fn role_swap_mirrors_results(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        let (win_a, win_b) = update_ratings(a, b, 1.0, 32.0);
        let (loss_b, loss_a) = update_ratings(b, a, 0.0, 32.0);
        prop_assert_eq!(win_a, loss_a);
        prop_assert_eq!(win_b, loss_b);
    }

    #[test]
    fn doubling_k_doubles_movement_up_to_rounding(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        let (half_k, _) = update_ratings(a, b, 1.0, 16.0);
        let (full_k, _) = update_ratings(a, b, 1.0, 32.0);
        let difference = (full_k - a) - 2 * (half_k - a);
        prop_assert!(difference.abs() <= 1, "difference was {}", difference);
    }

    #[test]
    fn matches_reference_elo_curve(
        a in MIN_RATING..MAX_RATING,
        b in MIN_RATING..MAX_RATING,
    ) {
        use skillratings::elo::{expected_score as reference_expected, EloRating};

        let ours = expected_score(a as f64, b as f64);
        let (theirs, _) = reference_expected(
            &EloRating { rating: a as f64 },
            &EloRating { rating: b as f64 },
        );
        prop_assert!((ours - theirs).abs() < 1e-9);
    }
}

#[test]
fn even_match_reference_points() {
    assert_eq!(update_ratings(1200, 1200, 1.0, 32.0), (1216, 1184));
    assert_eq!(update_ratings(1200, 1200, 0.0, 32.0), (1184, 1216));
    assert_eq!(update_ratings(1200, 1200, 0.5, 32.0), (1200, 1200));
}

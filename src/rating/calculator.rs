//! Rating calculator trait and implementations
//!
//! This module defines the interface for rating calculations so the match
//! recorder does not depend on a concrete rating model.

use crate::types::{MatchOutcome, Rating};
use serde::{Deserialize, Serialize};

/// Both sides' new ratings for one finished match, before persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRatingChange {
    pub new_team1_rating: Rating,
    pub new_team2_rating: Rating,
}

/// Trait for computing rating changes after matches
pub trait RatingCalculator: Send + Sync {
    /// Compute both teams' new ratings for a finished match
    ///
    /// # Arguments
    /// * `team1_rating` - current rating of the first team
    /// * `team2_rating` - current rating of the second team
    /// * `outcome` - match result seen from team1's side
    ///
    /// # Returns
    /// New ratings for both teams. The caller is responsible for persisting
    /// them onto the correct team records.
    fn rate(
        &self,
        team1_rating: Rating,
        team2_rating: Rating,
        outcome: MatchOutcome,
    ) -> crate::error::Result<MatchRatingChange>;

    /// Rating assigned to newly created teams
    fn initial_rating(&self) -> Rating;
}

/// Calculator that never moves ratings, for testing or fallback
#[derive(Debug, Clone)]
pub struct FixedRatingCalculator {
    initial_rating: Rating,
}

impl FixedRatingCalculator {
    pub fn new(initial_rating: Rating) -> Self {
        Self { initial_rating }
    }
}

impl Default for FixedRatingCalculator {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_RATING)
    }
}

impl RatingCalculator for FixedRatingCalculator {
    fn rate(
        &self,
        team1_rating: Rating,
        team2_rating: Rating,
        _outcome: MatchOutcome,
    ) -> crate::error::Result<MatchRatingChange> {
        Ok(MatchRatingChange {
            new_team1_rating: team1_rating,
            new_team2_rating: team2_rating,
        })
    }

    fn initial_rating(&self) -> Rating {
        self.initial_rating
    }
}

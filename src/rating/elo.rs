//! Elo rating implementation
//!
//! The classic logistic expected-score model: a 400-point rating gap makes
//! the stronger side a 10:1 favourite, and each match moves at most K points.

use crate::error::LadderError;
use crate::rating::calculator::{MatchRatingChange, RatingCalculator};
use crate::types::{MatchOutcome, Rating, DEFAULT_RATING};
use serde::{Deserialize, Serialize};

/// Default K-factor: each match moves at most 32 points per side
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Configuration for the Elo rating system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloConfig {
    /// Sensitivity factor, must be positive
    pub k_factor: f64,
    /// Rating assigned to new teams
    pub initial_rating: Rating,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            initial_rating: DEFAULT_RATING,
        }
    }
}

impl EloConfig {
    /// Create conservative configuration (slower rating changes)
    pub fn conservative() -> Self {
        Self {
            k_factor: 16.0,
            initial_rating: DEFAULT_RATING,
        }
    }

    /// Create aggressive configuration (faster rating changes)
    pub fn aggressive() -> Self {
        Self {
            k_factor: 64.0,
            initial_rating: DEFAULT_RATING,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(LadderError::Configuration {
                message: format!("K-factor must be positive, got {}", self.k_factor),
            }
            .into());
        }

        Ok(())
    }
}

/// Win probability for the self side, given both current ratings
///
/// `1 / (1 + 10^((opponent - self) / 400))`, strictly between 0 and 1 for
/// finite inputs, with `expected_score(a, b) + expected_score(b, a) == 1`
/// up to floating-point rounding. Non-finite input is outside the contract.
pub fn expected_score(rating_self: f64, rating_opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_opponent - rating_self) / 400.0))
}

/// Both sides' new ratings after a match
///
/// `score` is the result from side A: 1.0 win, 0.0 loss, 0.5 draw. Each side
/// is rounded to a whole rating independently (half away from zero, via
/// `f64::round`), so the two deltas are not guaranteed to cancel exactly.
pub fn update_ratings(rating_a: Rating, rating_b: Rating, score: f64, k: f64) -> (Rating, Rating) {
    let a = rating_a as f64;
    let b = rating_b as f64;

    let expected_a = expected_score(a, b);
    let expected_b = expected_score(b, a);

    let new_a = (a + k * (score - expected_a)).round() as Rating;
    let new_b = (b + k * ((1.0 - score) - expected_b)).round() as Rating;

    (new_a, new_b)
}

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: EloConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        Self {
            config: EloConfig::default(),
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn rate(
        &self,
        team1_rating: Rating,
        team2_rating: Rating,
        outcome: MatchOutcome,
    ) -> crate::error::Result<MatchRatingChange> {
        let (new_team1_rating, new_team2_rating) = update_ratings(
            team1_rating,
            team2_rating,
            outcome.team1_score(),
            self.config.k_factor,
        );

        Ok(MatchRatingChange {
            new_team1_rating,
            new_team2_rating,
        })
    }

    fn initial_rating(&self) -> Rating {
        self.config.initial_rating
    }
}

//! Rating system for ladder competition
//!
//! This module provides the Elo rating computation used after recorded
//! matches, behind a calculator trait so callers stay independent of the
//! concrete rating model.

pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use calculator::{FixedRatingCalculator, MatchRatingChange, RatingCalculator};
pub use elo::{expected_score, update_ratings, EloConfig, EloRatingCalculator};

//! Test fixtures and mock implementations for integration testing

use club_ladder::rating::calculator::{MatchRatingChange, RatingCalculator};
use club_ladder::store::{LadderStore, MemoryStore};
use club_ladder::types::{Enrolment, Ladder, MatchOutcome, Rating, Team, DEFAULT_RATING};
use std::sync::{Arc, Mutex};

/// Rating calculator double that records every call
///
/// Returns unchanged ratings unless a fixed result has been set.
#[derive(Debug, Default)]
pub struct CountingCalculator {
    calls: Mutex<Vec<(Rating, Rating, MatchOutcome)>>,
    fixed_result: Mutex<Option<MatchRatingChange>>,
}

impl CountingCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed result to return for all calculations
    pub fn set_fixed_result(&self, change: MatchRatingChange) {
        if let Ok(mut fixed) = self.fixed_result.lock() {
            *fixed = Some(change);
        }
    }

    /// Get all calculation calls made (for assertions)
    pub fn calls(&self) -> Vec<(Rating, Rating, MatchOutcome)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RatingCalculator for CountingCalculator {
    fn rate(
        &self,
        team1_rating: Rating,
        team2_rating: Rating,
        outcome: MatchOutcome,
    ) -> club_ladder::error::Result<MatchRatingChange> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((team1_rating, team2_rating, outcome));
        }

        if let Ok(fixed) = self.fixed_result.lock() {
            if let Some(change) = fixed.as_ref() {
                return Ok(*change);
            }
        }

        Ok(MatchRatingChange {
            new_team1_rating: team1_rating,
            new_team2_rating: team2_rating,
        })
    }

    fn initial_rating(&self) -> Rating {
        DEFAULT_RATING
    }
}

/// A store seeded with one ladder and a set of enrolled teams
pub struct SeededLadder {
    pub store: Arc<MemoryStore>,
    pub ladder: Ladder,
    pub teams: Vec<Team>,
}

/// Build a ladder with the given (team name, rating) pairs already enrolled
pub async fn seed_ladder(team_specs: &[(&str, Rating)]) -> SeededLadder {
    let store = Arc::new(MemoryStore::new());
    let ladder = store
        .create_ladder(Ladder::new("Test Ladder", None))
        .await
        .expect("seed ladder");

    let mut teams = Vec::with_capacity(team_specs.len());
    for (name, rating) in team_specs {
        let team = store
            .create_team(Team::new(*name, vec![], *rating))
            .await
            .expect("seed team");
        store
            .create_enrolment(Enrolment::new(ladder.id, team.id))
            .await
            .expect("seed enrolment");
        teams.push(team);
    }

    SeededLadder {
        store,
        ladder,
        teams,
    }
}

//! Match recording and rating persistence
//!
//! The recorder is the only writer of team ratings: it persists the match
//! record, asks the rating calculator for both sides' new ratings, and
//! writes them back through the injected store.

use crate::error::LadderError;
use crate::metrics::MetricsCollector;
use crate::rating::calculator::RatingCalculator;
use crate::store::LadderStore;
use crate::types::{
    LadderId, Match, MatchOutcome, RatingUpdate, Team, TeamId,
};
use crate::utils::{current_timestamp, generate_entity_id, rating_difference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Request to record a finished match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMatch {
    pub ladder_id: LadderId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub outcome: MatchOutcome,
    /// When the match was played; defaults to the recording time
    pub played_at: Option<DateTime<Utc>>,
}

/// A persisted match together with the rating updates it caused
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedMatch {
    pub record: Match,
    pub team1_update: RatingUpdate,
    pub team2_update: RatingUpdate,
}

/// Records matches and applies rating updates to the competing teams
pub struct MatchRecorder {
    store: Arc<dyn LadderStore>,
    calculator: Arc<dyn RatingCalculator>,
    metrics: Arc<MetricsCollector>,
}

impl MatchRecorder {
    pub fn new(
        store: Arc<dyn LadderStore>,
        calculator: Arc<dyn RatingCalculator>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            store,
            calculator,
            metrics,
        }
    }

    pub fn calculator(&self) -> Arc<dyn RatingCalculator> {
        self.calculator.clone()
    }

    /// Record a finished match and move both teams' ratings
    ///
    /// The match record is persisted first, then each team's new rating is
    /// written back as a separate store operation. There is no cross-team
    /// transaction: a failure between the two writes leaves the first one
    /// applied.
    pub async fn record_match(&self, request: NewMatch) -> crate::error::Result<RecordedMatch> {
        if request.team1_id == request.team2_id {
            return Err(LadderError::MatchBetweenSameTeam {
                team_id: request.team1_id.to_string(),
            }
            .into());
        }

        let ladder = self
            .store
            .get_ladder(request.ladder_id)
            .await?
            .ok_or_else(|| LadderError::LadderNotFound {
                ladder_id: request.ladder_id.to_string(),
            })?;

        let team1 = self.resolve_enrolled_team(request.ladder_id, request.team1_id).await?;
        let team2 = self.resolve_enrolled_team(request.ladder_id, request.team2_id).await?;

        let change = self
            .calculator
            .rate(team1.rating, team2.rating, request.outcome)?;
        let team1_delta = change.new_team1_rating - team1.rating;

        let record = self
            .store
            .create_match(Match {
                id: generate_entity_id(),
                ladder_id: ladder.id,
                team1_id: team1.id,
                team2_id: team2.id,
                outcome: request.outcome,
                rating_delta: Some(team1_delta),
                played_at: request.played_at.unwrap_or_else(current_timestamp),
                recorded_at: current_timestamp(),
            })
            .await?;

        let updated_team1 = self
            .store
            .update_team_rating(team1.id, change.new_team1_rating)
            .await?;
        let updated_team2 = self
            .store
            .update_team_rating(team2.id, change.new_team2_rating)
            .await?;

        self.metrics.record_match(request.outcome, team1_delta);

        info!(
            "Recorded match in ladder '{}': '{}' vs '{}' ({}), rating gap {}, \
             ratings {} -> {} and {} -> {}",
            ladder.name,
            team1.name,
            team2.name,
            request.outcome,
            rating_difference(team1.rating, team2.rating),
            team1.rating,
            updated_team1.rating,
            team2.rating,
            updated_team2.rating,
        );

        Ok(RecordedMatch {
            record,
            team1_update: RatingUpdate {
                team_id: team1.id,
                old_rating: team1.rating,
                new_rating: updated_team1.rating,
            },
            team2_update: RatingUpdate {
                team_id: team2.id,
                old_rating: team2.rating,
                new_rating: updated_team2.rating,
            },
        })
    }

    async fn resolve_enrolled_team(
        &self,
        ladder_id: LadderId,
        team_id: TeamId,
    ) -> crate::error::Result<Team> {
        let team = self
            .store
            .get_team(team_id)
            .await?
            .ok_or_else(|| LadderError::TeamNotFound {
                team_id: team_id.to_string(),
            })?;

        if !self.store.is_enrolled(ladder_id, team_id).await? {
            return Err(LadderError::TeamNotEnrolled {
                ladder_id: ladder_id.to_string(),
                team_id: team_id.to_string(),
            }
            .into());
        }

        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{EloConfig, EloRatingCalculator};
    use crate::store::MemoryStore;
    use crate::types::{Enrolment, Ladder, DEFAULT_RATING};

    struct Fixture {
        store: Arc<MemoryStore>,
        recorder: MatchRecorder,
        ladder: Ladder,
        team1: Team,
        team2: Team,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let calculator = Arc::new(EloRatingCalculator::new(EloConfig::default()).unwrap());
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let recorder = MatchRecorder::new(store.clone(), calculator, metrics);

        let ladder = store
            .create_ladder(Ladder::new("Club Ladder", None))
            .await
            .unwrap();
        let team1 = store
            .create_team(Team::new("Aces", vec![], DEFAULT_RATING))
            .await
            .unwrap();
        let team2 = store
            .create_team(Team::new("Volleys", vec![], DEFAULT_RATING))
            .await
            .unwrap();
        for team in [&team1, &team2] {
            store
                .create_enrolment(Enrolment::new(ladder.id, team.id))
                .await
                .unwrap();
        }

        Fixture {
            store,
            recorder,
            ladder,
            team1,
            team2,
        }
    }

    fn new_match(fixture: &Fixture, outcome: MatchOutcome) -> NewMatch {
        NewMatch {
            ladder_id: fixture.ladder.id,
            team1_id: fixture.team1.id,
            team2_id: fixture.team2.id,
            outcome,
            played_at: None,
        }
    }

    #[tokio::test]
    async fn test_win_moves_ratings_both_ways() {
        let fixture = setup().await;

        let recorded = fixture
            .recorder
            .record_match(new_match(&fixture, MatchOutcome::Team1Win))
            .await
            .unwrap();

        assert_eq!(recorded.team1_update.new_rating, 1216);
        assert_eq!(recorded.team2_update.new_rating, 1184);
        assert_eq!(recorded.record.rating_delta, Some(16));

        // Ratings were persisted, not just returned
        let team1 = fixture.store.get_team(fixture.team1.id).await.unwrap().unwrap();
        let team2 = fixture.store.get_team(fixture.team2.id).await.unwrap().unwrap();
        assert_eq!(team1.rating, 1216);
        assert_eq!(team2.rating, 1184);

        // Match record persisted with the ladder
        let matches = fixture.store.list_matches(fixture.ladder.id).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, recorded.record.id);
    }

    #[tokio::test]
    async fn test_draw_between_equals_keeps_ratings() {
        let fixture = setup().await;

        let recorded = fixture
            .recorder
            .record_match(new_match(&fixture, MatchOutcome::Draw))
            .await
            .unwrap();

        assert_eq!(recorded.team1_update.delta(), 0);
        assert_eq!(recorded.team2_update.delta(), 0);
        assert_eq!(recorded.record.rating_delta, Some(0));
    }

    #[tokio::test]
    async fn test_same_team_rejected() {
        let fixture = setup().await;

        let result = fixture
            .recorder
            .record_match(NewMatch {
                ladder_id: fixture.ladder.id,
                team1_id: fixture.team1.id,
                team2_id: fixture.team1.id,
                outcome: MatchOutcome::Team1Win,
                played_at: None,
            })
            .await;

        assert!(result.is_err());
        assert!(fixture
            .store
            .list_matches(fixture.ladder.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unenrolled_team_rejected() {
        let fixture = setup().await;
        let outsider = fixture
            .store
            .create_team(Team::new("Walk-ins", vec![], DEFAULT_RATING))
            .await
            .unwrap();

        let result = fixture
            .recorder
            .record_match(NewMatch {
                ladder_id: fixture.ladder.id,
                team1_id: fixture.team1.id,
                team2_id: outsider.id,
                outcome: MatchOutcome::Team1Win,
                played_at: None,
            })
            .await;

        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<LadderError>(),
            Some(LadderError::TeamNotEnrolled { .. })
        ));
        assert!(fixture
            .store
            .list_matches(fixture.ladder.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ladder_rejected() {
        let fixture = setup().await;

        let result = fixture
            .recorder
            .record_match(NewMatch {
                ladder_id: generate_entity_id(),
                team1_id: fixture.team1.id,
                team2_id: fixture.team2.id,
                outcome: MatchOutcome::Team1Win,
                played_at: None,
            })
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<LadderError>(),
            Some(LadderError::LadderNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_underdog_win_gains_more() {
        let fixture = setup().await;
        fixture
            .store
            .update_team_rating(fixture.team1.id, 1000)
            .await
            .unwrap();
        fixture
            .store
            .update_team_rating(fixture.team2.id, 1400)
            .await
            .unwrap();

        let recorded = fixture
            .recorder
            .record_match(new_match(&fixture, MatchOutcome::Team1Win))
            .await
            .unwrap();

        // A 400-point underdog winning takes ~10/11 of K
        assert_eq!(recorded.team1_update.delta(), 29);
        assert_eq!(recorded.team2_update.delta(), -29);
    }
}

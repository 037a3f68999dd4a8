//! Main application state and component wiring
//!
//! Builds the store, rating calculator, recorder, and metrics from an
//! `AppConfig` and hands them to the HTTP layer. Every component receives
//! its collaborators explicitly; nothing reaches for a global client.

use crate::config::{validate_config, AppConfig};
use crate::ladder::recorder::MatchRecorder;
use crate::metrics::MetricsCollector;
use crate::rating::{EloConfig, EloRatingCalculator, RatingCalculator};
use crate::store::{LadderStore, MemoryStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Shared application state
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn LadderStore>,
    recorder: Arc<MatchRecorder>,
    metrics: Arc<MetricsCollector>,
    started_at: Instant,
}

impl AppState {
    /// Create application state with the default in-memory store
    pub fn new(config: AppConfig) -> crate::error::Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create application state over an injected store implementation
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn LadderStore>,
    ) -> crate::error::Result<Self> {
        validate_config(&config)?;

        let metrics = Arc::new(MetricsCollector::new()?);
        let calculator: Arc<dyn RatingCalculator> =
            Arc::new(EloRatingCalculator::new(EloConfig {
                k_factor: config.rating.k_factor,
                initial_rating: config.rating.initial_rating,
            })?);
        let recorder = Arc::new(MatchRecorder::new(
            store.clone(),
            calculator,
            metrics.clone(),
        ));

        info!(
            "Initialized service '{}' (K={}, initial rating {})",
            config.service.name, config.rating.k_factor, config.rating.initial_rating
        );

        Ok(Self {
            config,
            store,
            recorder,
            metrics,
            started_at: Instant::now(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn LadderStore> {
        self.store.clone()
    }

    pub fn recorder(&self) -> Arc<MatchRecorder> {
        self.recorder.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::recorder::NewMatch;
    use crate::types::{Enrolment, Ladder, MatchOutcome, Team};

    #[test]
    fn test_state_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.rating.k_factor = 0.0;
        assert!(AppState::new(config).is_err());
    }

    #[tokio::test]
    async fn test_state_wires_configured_calculator() {
        let mut config = AppConfig::default();
        config.rating.initial_rating = 1000;
        config.rating.k_factor = 16.0;
        let state = AppState::new(config).unwrap();

        assert_eq!(state.recorder().calculator().initial_rating(), 1000);

        // A recorded match through the wired components moves K/2 = 8 points
        let store = state.store();
        let ladder = store
            .create_ladder(Ladder::new("Wired", None))
            .await
            .unwrap();
        let team1 = store
            .create_team(Team::new("A", vec![], 1000))
            .await
            .unwrap();
        let team2 = store
            .create_team(Team::new("B", vec![], 1000))
            .await
            .unwrap();
        for team in [&team1, &team2] {
            store
                .create_enrolment(Enrolment::new(ladder.id, team.id))
                .await
                .unwrap();
        }

        let recorded = state
            .recorder()
            .record_match(NewMatch {
                ladder_id: ladder.id,
                team1_id: team1.id,
                team2_id: team2.id,
                outcome: MatchOutcome::Team1Win,
                played_at: None,
            })
            .await
            .unwrap();

        assert_eq!(recorded.team1_update.new_rating, 1008);
        assert_eq!(recorded.team2_update.new_rating, 992);
    }
}

//! Health reporting for the ladder service

use crate::service::AppState;
use crate::types::EntityKind;
use serde::Serialize;

/// Overall service health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Entity counts and uptime reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub players: usize,
    pub teams: usize,
    pub ladders: usize,
    pub enrolments: usize,
    pub matches: usize,
    pub uptime_seconds: u64,
}

/// Health report combining status and stats
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub stats: ServiceStats,
}

/// Health check entry point
pub struct HealthCheck;

impl HealthCheck {
    /// Gather entity counts from the store and judge service health
    ///
    /// The store being unreachable is the only unhealthy condition for this
    /// deployment shape; it surfaces as the error branch.
    pub async fn check(state: &AppState) -> crate::error::Result<HealthReport> {
        let store = state.store();

        let stats = ServiceStats {
            players: store.count(EntityKind::Player).await?,
            teams: store.count(EntityKind::Team).await?,
            ladders: store.count(EntityKind::Ladder).await?,
            enrolments: store.count(EntityKind::Enrolment).await?,
            matches: store.count(EntityKind::Match).await?,
            uptime_seconds: state.uptime().as_secs(),
        };

        Ok(HealthReport {
            status: HealthStatus::Healthy,
            stats,
        })
    }
}

//! Metrics collection using Prometheus

use crate::types::{EntityKind, MatchOutcome};
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Main metrics collector for the ladder service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service: ServiceMetrics,

    /// Entity CRUD metrics
    entity: EntityMetrics,

    /// Match recording metrics
    matches: MatchMetrics,

    /// HTTP surface metrics
    http: HttpMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,
}

/// Entity CRUD metrics
#[derive(Clone)]
pub struct EntityMetrics {
    /// Total entities created, by kind
    pub created_total: IntCounterVec,

    /// Total entities deleted, by kind
    pub deleted_total: IntCounterVec,
}

/// Match recording metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Total matches recorded, by outcome
    pub recorded_total: IntCounterVec,

    /// Absolute rating points moved per recorded match
    pub rating_points_moved: Histogram,
}

/// HTTP surface metrics
#[derive(Clone)]
pub struct HttpMetrics {
    /// Total requests served, by route and status
    pub requests_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create a new metrics collector with a custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service = ServiceMetrics::new(&registry)?;
        let entity = EntityMetrics::new(&registry)?;
        let matches = MatchMetrics::new(&registry)?;
        let http = HttpMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service,
            entity,
            matches,
            http,
        })
    }

    pub fn set_uptime(&self, seconds: u64) {
        self.service.uptime_seconds.set(seconds as i64);
    }

    pub fn record_entity_created(&self, kind: EntityKind) {
        self.entity
            .created_total
            .with_label_values(&[&kind.to_string()])
            .inc();
    }

    pub fn record_entity_deleted(&self, kind: EntityKind, count: u64) {
        self.entity
            .deleted_total
            .with_label_values(&[&kind.to_string()])
            .inc_by(count);
    }

    pub fn record_match(&self, outcome: MatchOutcome, rating_delta: i32) {
        self.matches
            .recorded_total
            .with_label_values(&[&outcome.to_string()])
            .inc();
        self.matches
            .rating_points_moved
            .observe(rating_delta.unsigned_abs() as f64);
    }

    pub fn record_http_request(&self, route: &str, status: u16) {
        self.http
            .requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Render all registered metrics in Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds = IntGauge::with_opts(Opts::new(
            "ladder_uptime_seconds",
            "Service uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self { uptime_seconds })
    }
}

impl EntityMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let created_total = IntCounterVec::new(
            Opts::new("ladder_entities_created_total", "Entities created"),
            &["kind"],
        )?;
        registry.register(Box::new(created_total.clone()))?;

        let deleted_total = IntCounterVec::new(
            Opts::new("ladder_entities_deleted_total", "Entities deleted"),
            &["kind"],
        )?;
        registry.register(Box::new(deleted_total.clone()))?;

        Ok(Self {
            created_total,
            deleted_total,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let recorded_total = IntCounterVec::new(
            Opts::new("ladder_matches_recorded_total", "Matches recorded"),
            &["outcome"],
        )?;
        registry.register(Box::new(recorded_total.clone()))?;

        let rating_points_moved = Histogram::with_opts(
            HistogramOpts::new(
                "ladder_rating_points_moved",
                "Absolute rating points moved per recorded match",
            )
            .buckets(vec![0.0, 2.0, 4.0, 8.0, 16.0, 24.0, 32.0, 48.0, 64.0]),
        )?;
        registry.register(Box::new(rating_points_moved.clone()))?;

        Ok(Self {
            recorded_total,
            rating_points_moved,
        })
    }
}

impl HttpMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("ladder_http_requests_total", "HTTP requests served"),
            &["route", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        Ok(Self { requests_total })
    }
}

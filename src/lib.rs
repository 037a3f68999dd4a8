//! Club Ladder - ladder competition service for racket-sport clubs
//!
//! This crate manages players, teams, ladder enrolment, and recorded
//! matches with Elo rating updates, behind an HTTP JSON API.

pub mod config;
pub mod error;
pub mod http;
pub mod ladder;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LadderError, Result};
pub use types::*;

// Re-export key components
pub use ladder::recorder::MatchRecorder;
pub use rating::{EloConfig, EloRatingCalculator, RatingCalculator};
pub use store::{LadderStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

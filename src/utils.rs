//! Utility functions for the ladder service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique entity ID
pub fn generate_entity_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: i32, rating2: i32) -> i32 {
    (rating1 - rating2).abs()
}

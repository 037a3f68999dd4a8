//! HTTP surface for the ladder service
//!
//! One axum server hosts the CRUD API, match recording, standings, and the
//! health/metrics endpoints.

pub mod api;
pub mod health;
pub mod server;

pub use server::{HttpServer, HttpServerConfig};

//! empdir - Employee directory service
//!
//! Ingests a loosely-typed employee payload from a remote endpoint,
//! normalizes it into a stable in-memory model, enriches unknown city
//! coordinates through rate-limited geocoding, and serves a read-only
//! query surface (lookup, search, ranking, aggregation) over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult, Error, Result};

use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session store owning the load state machine and the directory
    pub store: Arc<SessionStore>,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> axum::Router {
    api::routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! musify-artist library interface
//!
//! Aggregates artist details from MusicBrainz, Wikidata, Wikipedia and the
//! Cover Art Archive behind a single HTTP endpoint.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::ArtistAggregator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<ArtistAggregator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(aggregator: ArtistAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::artist_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

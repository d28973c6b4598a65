//! HTTP API handlers for musify-artist

pub mod artist;
pub mod health;

pub use artist::artist_routes;
pub use health::health_routes;

//! Business logic services for musify-artist

pub mod artist_aggregator;

pub use artist_aggregator::{ArtistAggregator, CacheStats};

//! # Musify Common Library
//!
//! Shared code for the Musify services:
//! - Error types
//! - Bounded, time-expiring in-memory cache
//! - TOML configuration model and loading

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheSettings, TtlCache};
pub use error::{Error, Result};

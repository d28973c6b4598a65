//! Upstream API clients
//!
//! One client per external dependency. Each owns its cache and follows the
//! same protocol: serve from cache when possible, otherwise GET the JSON
//! resource (retrying server-side failures) and cache the parsed result.

pub mod cover_art;
pub mod error;
pub mod http;
pub mod musicbrainz;
pub mod retry;
pub mod wikidata;
pub mod wikipedia;

pub use cover_art::{primary_image, CoverArtClient, CoverImage};
pub use error::{Dependency, UpstreamError};
pub use http::UpstreamSettings;
pub use musicbrainz::{MBAlbum, MBArtist, MusicBrainzClient};
pub use retry::RetryPolicy;
pub use wikidata::WikidataClient;
pub use wikipedia::WikipediaClient;

//! Response models for the artist endpoint

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregated artist record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub mbid: Uuid,
    pub name: String,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub disambiguation: Option<String>,
    /// HTML summary from Wikipedia; `None` when the artist has no Wikidata
    /// link or the lookup chain failed
    pub description: Option<String>,
    /// Albums in MusicBrainz order
    pub albums: Vec<Album>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    /// Primary cover image; `None` when there is none or the lookup failed
    pub image_url: Option<String>,
}

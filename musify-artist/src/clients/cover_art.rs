//! Cover Art Archive client
//!
//! Looks up the images of a release group and picks one primary image.

use musify_common::TtlCache;
use serde::Deserialize;
use uuid::Uuid;

use super::error::{Dependency, UpstreamError};
use super::http::{JsonHttpClient, UpstreamSettings};

#[derive(Debug, Deserialize)]
struct ReleaseGroupResponse {
    #[serde(default)]
    images: Vec<CoverImage>,
}

/// Candidate cover image
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub front: bool,
    /// Full-size image URL
    pub image: String,
}

/// Select the primary image: approved front, then any front, then any
/// approved, then the first image. Ties go to the earliest in the list.
pub fn primary_image(images: &[CoverImage]) -> Option<&CoverImage> {
    images
        .iter()
        .find(|image| image.approved && image.front)
        .or_else(|| images.iter().find(|image| image.front))
        .or_else(|| images.iter().find(|image| image.approved))
        .or_else(|| images.first())
}

pub struct CoverArtClient {
    http: JsonHttpClient,
    cache: TtlCache<Uuid, String>,
}

impl CoverArtClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: JsonHttpClient::new(Dependency::CoverArtArchive, settings, true)?,
            cache: TtlCache::new(settings.cache),
        })
    }

    /// URL of the album's primary cover image, or `None` if it has no images.
    /// Only found URLs are cached.
    pub async fn primary_image_url(&self, album_id: Uuid) -> Result<Option<String>, UpstreamError> {
        if let Some(url) = self.cache.get(&album_id) {
            tracing::trace!(album = %album_id, "Cover art cache hit");
            return Ok(Some(url));
        }

        let key = album_id.to_string();
        let path = format!("/release-group/{}", album_id);
        let response: ReleaseGroupResponse = self.http.get_json(&path, &key).await?;

        let url = primary_image(&response.images).map(|image| image.image.clone());
        if let Some(url) = &url {
            self.cache.put(album_id, url.clone());
        }

        Ok(url)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

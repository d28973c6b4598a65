//! Artist aggregation
//!
//! Builds an [`Artist`] from four upstream services:
//!
//! 1. MusicBrainz artist lookup. Mandatory: every later step depends on it,
//!    and its failure (including not-found) fails the whole request.
//! 2. Concurrently:
//!    - one Cover Art Archive lookup per album
//!    - Wikidata title lookup, then the Wikipedia summary for that title
//! 3. Assembly in MusicBrainz album order.
//!
//! Step 2 failures never fail the request. A failed cover lookup leaves
//! that album's `image_url` empty without affecting its siblings, and any
//! failure in the description chain leaves `description` empty. Each such
//! failure is logged with the dependency and entity key.
//!
//! Sub-lookups run as futures polled together on the request's task, so
//! dropping the request future abandons every in-flight lookup.

use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::{
    CoverArtClient, MBAlbum, MBArtist, MusicBrainzClient, UpstreamError, WikidataClient,
    WikipediaClient,
};
use crate::config::ServiceConfig;
use crate::models::{Album, Artist};

/// Entry counts of the per-dependency caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub musicbrainz: usize,
    pub wikidata: usize,
    pub wikipedia: usize,
    pub cover_art: usize,
}

pub struct ArtistAggregator {
    musicbrainz: MusicBrainzClient,
    wikidata: WikidataClient,
    wikipedia: WikipediaClient,
    cover_art: CoverArtClient,
}

impl ArtistAggregator {
    pub fn new(
        musicbrainz: MusicBrainzClient,
        wikidata: WikidataClient,
        wikipedia: WikipediaClient,
        cover_art: CoverArtClient,
    ) -> Self {
        Self {
            musicbrainz,
            wikidata,
            wikipedia,
            cover_art,
        }
    }

    /// Build all four clients from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, UpstreamError> {
        Ok(Self::new(
            MusicBrainzClient::new(&config.musicbrainz)?,
            WikidataClient::new(&config.wikidata)?,
            WikipediaClient::new(&config.wikipedia)?,
            CoverArtClient::new(&config.cover_art)?,
        ))
    }

    /// Resolve the full artist record for a MusicBrainz artist id
    ///
    /// Fails only if the MusicBrainz lookup fails; the error is returned
    /// unchanged so [`UpstreamError::NotFound`] reaches the caller as such.
    pub async fn resolve(&self, mbid: Uuid) -> Result<Artist, UpstreamError> {
        let artist = self.musicbrainz.lookup_artist(mbid).await?;

        let (albums, description) = tokio::join!(
            self.resolve_albums(&artist),
            self.resolve_description(&artist)
        );

        info!(
            mbid = %mbid,
            albums = albums.len(),
            covers = albums.iter().filter(|a| a.image_url.is_some()).count(),
            description = description.is_some(),
            "Resolved artist"
        );

        Ok(Artist {
            mbid: artist.mbid,
            name: artist.name,
            gender: artist.gender,
            country: artist.country,
            disambiguation: artist.disambiguation,
            description,
            albums,
        })
    }

    /// `join_all` yields results in input order regardless of completion order
    async fn resolve_albums(&self, artist: &MBArtist) -> Vec<Album> {
        join_all(artist.albums.iter().map(|album| self.resolve_album(album))).await
    }

    async fn resolve_album(&self, album: &MBAlbum) -> Album {
        let image_url = match self.cover_art.primary_image_url(album.id).await {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    dependency = %e.dependency(),
                    album = %album.id,
                    error = %e,
                    "Failed to load cover for album"
                );
                None
            }
        };

        Album {
            id: album.id,
            title: album.title.clone(),
            image_url,
        }
    }

    async fn resolve_description(&self, artist: &MBArtist) -> Option<String> {
        let Some(entity_id) = artist.wikidata_id.as_deref() else {
            debug!(mbid = %artist.mbid, "Artist has no Wikidata link");
            return None;
        };

        let title = match self.wikidata.lookup_wikipedia_title(entity_id).await {
            Ok(Some(title)) => title,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    dependency = %e.dependency(),
                    mbid = %artist.mbid,
                    entity = %entity_id,
                    error = %e,
                    "Failed to resolve Wikipedia title"
                );
                return None;
            }
        };

        match self.wikipedia.fetch_summary(&title).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(
                    dependency = %e.dependency(),
                    mbid = %artist.mbid,
                    title = %title,
                    error = %e,
                    "Failed to load Wikipedia summary"
                );
                None
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            musicbrainz: self.musicbrainz.cached_entries(),
            wikidata: self.wikidata.cached_entries(),
            wikipedia: self.wikipedia.cached_entries(),
            cover_art: self.cover_art.cached_entries(),
        }
    }
}

//! MusicBrainz API client
//!
//! Authoritative source for artist identity, the artist's Wikidata link and
//! its album release groups. This is the only client that reports a missing
//! entity as [`UpstreamError::NotFound`].

use musify_common::TtlCache;
use serde::Deserialize;
use uuid::Uuid;

use super::error::{Dependency, UpstreamError};
use super::http::{last_path_segment, JsonHttpClient, UpstreamSettings};

const ARTIST_INCLUDES: &str = "url-rels+release-groups";
const WIKIDATA_RELATION: &str = "wikidata";
const ALBUM_PRIMARY_TYPE: &str = "Album";

/// Artist lookup response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArtistResponse {
    pub id: Uuid,
    pub name: String,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(rename = "release-groups", default)]
    pub release_groups: Vec<ReleaseGroup>,
}

/// Relation to an external URL
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Relation {
    #[serde(rename = "type")]
    pub relation_type: String,
    pub url: Option<RelationUrl>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RelationUrl {
    pub resource: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReleaseGroup {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "primary-type")]
    pub primary_type: Option<String>,
}

/// Artist as used by the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct MBArtist {
    pub mbid: Uuid,
    pub name: String,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub disambiguation: Option<String>,
    /// Wikidata entity id (e.g. `Q42`) if the artist links to Wikidata
    pub wikidata_id: Option<String>,
    /// Release groups whose primary type is "Album", in response order
    pub albums: Vec<MBAlbum>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MBAlbum {
    pub id: Uuid,
    pub title: String,
}

impl From<ArtistResponse> for MBArtist {
    fn from(response: ArtistResponse) -> Self {
        let wikidata_id = wikidata_id(&response.relations);
        let albums = response
            .release_groups
            .into_iter()
            .filter(|group| group.primary_type.as_deref() == Some(ALBUM_PRIMARY_TYPE))
            .map(|group| MBAlbum {
                id: group.id,
                title: group.title,
            })
            .collect();

        Self {
            mbid: response.id,
            name: response.name,
            gender: response.gender,
            country: response.country,
            disambiguation: response.disambiguation,
            wikidata_id,
            albums,
        }
    }
}

fn wikidata_id(relations: &[Relation]) -> Option<String> {
    relations
        .iter()
        .find(|relation| relation.relation_type == WIKIDATA_RELATION)
        .and_then(|relation| relation.url.as_ref())
        .and_then(|url| last_path_segment(&url.resource))
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http: JsonHttpClient,
    cache: TtlCache<Uuid, MBArtist>,
}

impl MusicBrainzClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: JsonHttpClient::new(Dependency::MusicBrainz, settings, false)?,
            cache: TtlCache::new(settings.cache),
        })
    }

    /// Lookup artist by MBID
    pub async fn lookup_artist(&self, mbid: Uuid) -> Result<MBArtist, UpstreamError> {
        if let Some(artist) = self.cache.get(&mbid) {
            tracing::trace!(mbid = %mbid, "MusicBrainz cache hit");
            return Ok(artist);
        }

        let key = mbid.to_string();
        let path = format!("/artist/{}?fmt=json&inc={}", mbid, ARTIST_INCLUDES);

        let response: ArtistResponse = self
            .http
            .get_json(&path, &key)
            .await
            .map_err(|e| match e {
                UpstreamError::Client {
                    dependency,
                    key,
                    status: 404,
                } => UpstreamError::NotFound { dependency, key },
                other => other,
            })?;

        let artist = MBArtist::from(response);

        tracing::info!(
            mbid = %mbid,
            name = %artist.name,
            albums = artist.albums.len(),
            wikidata = artist.wikidata_id.as_deref().unwrap_or("none"),
            "Retrieved artist from MusicBrainz"
        );

        self.cache.put(mbid, artist.clone());
        Ok(artist)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

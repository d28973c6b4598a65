//! Shared test utilities: mock upstreams, client settings and JSON fixtures
#![allow(dead_code)]

pub mod mock_upstream;

use std::time::Duration;

use musify_artist::clients::{
    CoverArtClient, MusicBrainzClient, RetryPolicy, UpstreamSettings, WikidataClient,
    WikipediaClient,
};
use musify_artist::services::ArtistAggregator;
use musify_common::CacheSettings;
use serde_json::{json, Value};
use uuid::Uuid;

pub use mock_upstream::{MockResponse, MockUpstream};

/// Settings with fast retries so server-error tests stay quick
pub fn test_settings(base_url: &str) -> UpstreamSettings {
    UpstreamSettings {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(2),
        retry: RetryPolicy {
            max_retries: 3,
            min_backoff: Duration::from_millis(10),
            jitter: 0.5,
        },
        cache: CacheSettings::new(Duration::from_secs(60), 100),
    }
}

/// One mock server per upstream dependency
pub struct Upstreams {
    pub musicbrainz: MockUpstream,
    pub wikidata: MockUpstream,
    pub wikipedia: MockUpstream,
    pub cover_art: MockUpstream,
}

impl Upstreams {
    pub async fn start() -> Self {
        Self {
            musicbrainz: MockUpstream::start().await,
            wikidata: MockUpstream::start().await,
            wikipedia: MockUpstream::start().await,
            cover_art: MockUpstream::start().await,
        }
    }

    pub fn aggregator(&self) -> ArtistAggregator {
        ArtistAggregator::new(
            MusicBrainzClient::new(&test_settings(&self.musicbrainz.base_url())).unwrap(),
            WikidataClient::new(&test_settings(&self.wikidata.base_url())).unwrap(),
            WikipediaClient::new(&test_settings(&self.wikipedia.base_url())).unwrap(),
            CoverArtClient::new(&test_settings(&self.cover_art.base_url())).unwrap(),
        )
    }
}

/// MusicBrainz artist lookup body
pub fn mb_artist_json(mbid: Uuid, wikidata_id: Option<&str>, albums: &[(Uuid, &str)]) -> Value {
    let relations: Vec<Value> = wikidata_id
        .map(|id| {
            vec![json!({
                "type": "wikidata",
                "url": { "resource": format!("https://www.wikidata.org/wiki/{}", id) }
            })]
        })
        .unwrap_or_default();

    let release_groups: Vec<Value> = albums
        .iter()
        .map(|(id, title)| json!({ "id": id, "title": title, "primary-type": "Album" }))
        .collect();

    json!({
        "id": mbid,
        "name": "Donald",
        "gender": "Male",
        "country": "US",
        "disambiguation": "King of Ducks",
        "relations": relations,
        "release-groups": release_groups,
    })
}

/// Wikidata entity data body with an optional English Wikipedia link
pub fn wikidata_json(entity_id: &str, enwiki_title: Option<&str>) -> Value {
    let sitelinks = match enwiki_title {
        Some(title) => json!({
            "enwiki": { "url": format!("https://en.wikipedia.org/wiki/{}", title) }
        }),
        None => json!({}),
    };

    json!({ "entities": { entity_id: { "sitelinks": sitelinks } } })
}

/// Wikipedia page summary body
pub fn wikipedia_json(extract_html: &str) -> Value {
    json!({ "title": "Donald Duck", "extract_html": extract_html })
}

/// Cover Art Archive release group body; each image is (approved, front, url)
pub fn cover_art_json(images: &[(bool, bool, &str)]) -> Value {
    let images: Vec<Value> = images
        .iter()
        .map(|(approved, front, url)| json!({ "approved": approved, "front": front, "image": url }))
        .collect();

    json!({ "images": images })
}

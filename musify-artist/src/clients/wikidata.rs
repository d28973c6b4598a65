//! Wikidata client
//!
//! Resolves a Wikidata entity id to the title of its English Wikipedia page.

use std::collections::HashMap;

use musify_common::TtlCache;
use serde::Deserialize;

use super::error::{Dependency, UpstreamError};
use super::http::{last_path_segment, JsonHttpClient, UpstreamSettings};

#[derive(Debug, Deserialize)]
struct EntityDataResponse {
    #[serde(default)]
    entities: HashMap<String, Entity>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    #[serde(default)]
    sitelinks: SiteLinks,
}

#[derive(Debug, Default, Deserialize)]
struct SiteLinks {
    enwiki: Option<SiteLink>,
}

#[derive(Debug, Deserialize)]
struct SiteLink {
    url: String,
}

impl EntityDataResponse {
    fn english_title(&self, entity_id: &str) -> Option<String> {
        let link = self.entities.get(entity_id)?.sitelinks.enwiki.as_ref()?;
        last_path_segment(&link.url)
    }
}

/// Wikidata entity data client
pub struct WikidataClient {
    http: JsonHttpClient,
    cache: TtlCache<String, String>,
}

impl WikidataClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: JsonHttpClient::new(Dependency::Wikidata, settings, true)?,
            cache: TtlCache::new(settings.cache),
        })
    }

    /// English Wikipedia page title for an entity, or `None` if the entity
    /// has no English site link. Only found titles are cached.
    pub async fn lookup_wikipedia_title(
        &self,
        entity_id: &str,
    ) -> Result<Option<String>, UpstreamError> {
        let key = entity_id.to_string();
        if let Some(title) = self.cache.get(&key) {
            tracing::trace!(entity = %entity_id, "Wikidata cache hit");
            return Ok(Some(title));
        }

        let path = format!("/Special:EntityData/{}.json", entity_id);
        let response: EntityDataResponse = self.http.get_json(&path, entity_id).await?;

        let title = response.english_title(entity_id);
        match &title {
            Some(title) => self.cache.put(key, title.clone()),
            None => tracing::debug!(entity = %entity_id, "No English Wikipedia link"),
        }

        Ok(title)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

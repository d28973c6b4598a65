//! Wikipedia REST client for page summaries

use musify_common::TtlCache;
use serde::Deserialize;

use super::error::{Dependency, UpstreamError};
use super::http::{JsonHttpClient, UpstreamSettings};

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    extract_html: String,
}

pub struct WikipediaClient {
    http: JsonHttpClient,
    cache: TtlCache<String, String>,
}

impl WikipediaClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: JsonHttpClient::new(Dependency::Wikipedia, settings, true)?,
            cache: TtlCache::new(settings.cache),
        })
    }

    /// HTML extract of a page summary. `page_title` is used as-is in the
    /// request path, so it must already be percent-encoded.
    pub async fn fetch_summary(&self, page_title: &str) -> Result<String, UpstreamError> {
        let key = page_title.to_string();
        if let Some(summary) = self.cache.get(&key) {
            tracing::trace!(title = %page_title, "Wikipedia cache hit");
            return Ok(summary);
        }

        let path = format!("/page/summary/{}", page_title);
        let response: SummaryResponse = self.http.get_json(&path, page_title).await?;

        self.cache.put(key, response.extract_html.clone());
        Ok(response.extract_html)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

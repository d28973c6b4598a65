//! JSON-over-HTTP plumbing shared by the upstream clients

use std::time::Duration;

use musify_common::cache::CacheSettings;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::redirect;
use serde::de::DeserializeOwned;

use super::error::{Dependency, UpstreamError};
use super::retry::RetryPolicy;

const USER_AGENT: &str = concat!(
    "Musify/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/musify/musify)"
);

/// Connection, retry and cache settings for one upstream client
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Base URL the client's path templates are appended to
    pub base_url: String,
    /// Applied to both connecting and waiting for the response
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub cache: CacheSettings,
}

/// reqwest client bound to one dependency and base URL
pub(crate) struct JsonHttpClient {
    http: reqwest::Client,
    base_url: String,
    dependency: Dependency,
    retry: RetryPolicy,
}

impl JsonHttpClient {
    pub(crate) fn new(
        dependency: Dependency,
        settings: &UpstreamSettings,
        follow_redirects: bool,
    ) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let redirect_policy = if follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(settings.timeout)
            .timeout(settings.timeout)
            .redirect(redirect_policy)
            .build()
            .map_err(|e| UpstreamError::Transport {
                dependency,
                key: settings.base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            dependency,
            retry: settings.retry.clone(),
        })
    }

    /// GET `base_url + path` and decode the JSON body, retrying per policy.
    ///
    /// `key` identifies the requested entity in errors and logs.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        self.retry.run(|| self.get_once(&url, key)).await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        key: &str,
    ) -> Result<T, UpstreamError> {
        tracing::debug!(dependency = %self.dependency, key = %key, url = %url, "Querying upstream");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(self.dependency, key, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::from_status(
                self.dependency,
                key,
                status.as_u16(),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(self.dependency, key, e))
    }
}

/// Last non-empty path segment of a URL, e.g. `Q42` for
/// `https://www.wikidata.org/wiki/Q42`
pub(crate) fn last_path_segment(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

//! Configuration resolution for musify-artist
//!
//! Combines the TOML file with environment overrides and per-dependency
//! defaults. **Priority:** ENV → TOML → compiled default. Base URLs have no
//! compiled default and must come from one of the first two.

use std::time::Duration;

use musify_common::config::{TomlConfig, UpstreamConfig};
use musify_common::{Error, Result};
use tracing::info;

use crate::clients::{Dependency, RetryPolicy, UpstreamSettings};

pub const MUSICBRAINZ_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const WIKIDATA_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const WIKIPEDIA_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);
pub const COVER_ART_CACHE_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

pub const TIMEOUT_ENV: &str = "MUSIFY_TIMEOUT_MS";

/// Environment variable overriding a dependency's base URL
pub fn base_url_env(dependency: Dependency) -> &'static str {
    match dependency {
        Dependency::MusicBrainz => "MUSIFY_MUSICBRAINZ_URL",
        Dependency::Wikidata => "MUSIFY_WIKIDATA_URL",
        Dependency::Wikipedia => "MUSIFY_WIKIPEDIA_URL",
        Dependency::CoverArtArchive => "MUSIFY_COVER_ART_URL",
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub musicbrainz: UpstreamSettings,
    pub wikidata: UpstreamSettings,
    pub wikipedia: UpstreamSettings,
    pub cover_art: UpstreamSettings,
}

impl ServiceConfig {
    pub fn resolve(toml: &TomlConfig) -> Result<Self> {
        let timeout_ms = match std::env::var(TIMEOUT_ENV) {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a number of milliseconds, got {:?}",
                    TIMEOUT_ENV, value
                ))
            })?,
            Err(_) => toml.clients.timeout_ms,
        };
        let timeout = Duration::from_millis(timeout_ms);

        if !toml.clients.retry.jitter.is_finite() {
            return Err(Error::Config(format!(
                "clients.retry.jitter must be a finite number, got {}",
                toml.clients.retry.jitter
            )));
        }
        let retry = RetryPolicy::from_config(&toml.clients.retry);

        let upstream = |dependency, section: &UpstreamConfig, default_ttl| {
            resolve_upstream(dependency, section, default_ttl, timeout, &retry)
        };

        Ok(Self {
            bind_addr: toml.server.bind_addr.clone(),
            musicbrainz: upstream(
                Dependency::MusicBrainz,
                &toml.clients.musicbrainz,
                MUSICBRAINZ_CACHE_TTL,
            )?,
            wikidata: upstream(
                Dependency::Wikidata,
                &toml.clients.wikidata,
                WIKIDATA_CACHE_TTL,
            )?,
            wikipedia: upstream(
                Dependency::Wikipedia,
                &toml.clients.wikipedia,
                WIKIPEDIA_CACHE_TTL,
            )?,
            cover_art: upstream(
                Dependency::CoverArtArchive,
                &toml.clients.cover_art,
                COVER_ART_CACHE_TTL,
            )?,
        })
    }
}

fn resolve_upstream(
    dependency: Dependency,
    section: &UpstreamConfig,
    default_ttl: Duration,
    timeout: Duration,
    retry: &RetryPolicy,
) -> Result<UpstreamSettings> {
    let env_name = base_url_env(dependency);
    let env_url = std::env::var(env_name)
        .ok()
        .filter(|url| !url.trim().is_empty());

    let base_url = match (env_url, &section.base_url) {
        (Some(url), _) => {
            info!("{} base URL loaded from environment variable", dependency);
            url
        }
        (None, Some(url)) if !url.trim().is_empty() => url.clone(),
        _ => {
            return Err(Error::Config(format!(
                "{} base URL not configured. Set {} or clients.{}.base_url in the TOML config",
                dependency,
                env_name,
                toml_section(dependency)
            )))
        }
    };

    Ok(UpstreamSettings {
        base_url,
        timeout,
        retry: retry.clone(),
        cache: section.cache_settings(default_ttl),
    })
}

fn toml_section(dependency: Dependency) -> &'static str {
    match dependency {
        Dependency::MusicBrainz => "musicbrainz",
        Dependency::Wikidata => "wikidata",
        Dependency::Wikipedia => "wikipedia",
        Dependency::CoverArtArchive => "cover_art",
    }
}

//! Upstream failure taxonomy
//!
//! Every failure is tagged with the dependency it occurred against and the
//! entity key being fetched, so a logged error is enough to diagnose it.

use std::fmt;
use thiserror::Error;

/// External services the aggregator depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    MusicBrainz,
    Wikidata,
    Wikipedia,
    CoverArtArchive,
}

impl Dependency {
    pub fn name(&self) -> &'static str {
        match self {
            Dependency::MusicBrainz => "musicbrainz",
            Dependency::Wikidata => "wikidata",
            Dependency::Wikipedia => "wikipedia",
            Dependency::CoverArtArchive => "coverartarchive",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upstream client errors
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The requested entity does not exist upstream. Only raised by the
    /// MusicBrainz client; other dependencies degrade to an absent value.
    #[error("{dependency}: {key} not found")]
    NotFound { dependency: Dependency, key: String },

    /// 4xx (or unexpected non-success) status
    #[error("{dependency}: request for {key} failed with status {status}")]
    Client {
        dependency: Dependency,
        key: String,
        status: u16,
    },

    /// 5xx status
    #[error("{dependency}: request for {key} failed with status {status}")]
    Server {
        dependency: Dependency,
        key: String,
        status: u16,
    },

    #[error("{dependency}: request for {key} timed out")]
    Timeout { dependency: Dependency, key: String },

    /// Connection-level failure (refused, reset, DNS)
    #[error("{dependency}: request for {key} failed: {message}")]
    Transport {
        dependency: Dependency,
        key: String,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("{dependency}: could not decode response for {key}: {message}")]
    Decode {
        dependency: Dependency,
        key: String,
        message: String,
    },
}

impl UpstreamError {
    /// Whether the failure is server-side and worth retrying.
    ///
    /// Timeouts and connection failures count as server errors.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::Server { .. }
                | UpstreamError::Timeout { .. }
                | UpstreamError::Transport { .. }
        )
    }

    pub fn dependency(&self) -> Dependency {
        match self {
            UpstreamError::NotFound { dependency, .. }
            | UpstreamError::Client { dependency, .. }
            | UpstreamError::Server { dependency, .. }
            | UpstreamError::Timeout { dependency, .. }
            | UpstreamError::Transport { dependency, .. }
            | UpstreamError::Decode { dependency, .. } => *dependency,
        }
    }

    /// Classify a reqwest failure that happened before a status was received
    pub(crate) fn from_reqwest(dependency: Dependency, key: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                dependency,
                key: key.to_string(),
            }
        } else if err.is_decode() {
            UpstreamError::Decode {
                dependency,
                key: key.to_string(),
                message: err.to_string(),
            }
        } else {
            UpstreamError::Transport {
                dependency,
                key: key.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP status
    pub(crate) fn from_status(dependency: Dependency, key: &str, status: u16) -> Self {
        if (500..600).contains(&status) {
            UpstreamError::Server {
                dependency,
                key: key.to_string(),
                status,
            }
        } else {
            UpstreamError::Client {
                dependency,
                key: key.to_string(),
                status,
            }
        }
    }
}

//! Retry with exponential backoff for server-side upstream failures

use std::future::Future;
use std::time::Duration;

use musify_common::config::RetryConfig;
use rand::Rng;

use super::error::UpstreamError;

/// Upper bound on a single retry delay before jitter
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Retry schedule applied to every upstream request
///
/// Only failures where [`UpstreamError::is_retryable`] holds are retried.
/// The n-th retry waits `min_backoff * 2^(n-1)`, spread by a random factor of
/// up to `jitter` in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_backoff: Duration,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Jitter is clamped to `0.0..=1.0`; a non-finite jitter falls back to
    /// the default. The initial backoff is capped at [`MAX_BACKOFF`].
    pub fn from_config(config: &RetryConfig) -> Self {
        let jitter = if config.jitter.is_finite() {
            config.jitter.clamp(0.0, 1.0)
        } else {
            RetryConfig::default().jitter
        };

        Self {
            max_retries: config.max_retries,
            min_backoff: Duration::from_millis(config.min_backoff_ms).min(MAX_BACKOFF),
            jitter,
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            min_backoff: Duration::ZERO,
            jitter: 0.0,
        }
    }

    /// Un-jittered delay before retry number `retry` (zero-based), capped at
    /// [`MAX_BACKOFF`]
    pub fn backoff(&self, retry: u32) -> Duration {
        self.min_backoff
            .saturating_mul(2u32.saturating_pow(retry))
            .min(MAX_BACKOFF)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        // NaN would make the sample range empty
        if self.jitter.is_nan() || self.jitter <= 0.0 || self.jitter > 1.0 {
            return delay;
        }
        let factor = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        delay.mul_f64(1.0 + factor)
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent. The last error is returned on exhaustion.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let mut retries = 0;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    let delay = self.jittered(self.backoff(retries));
                    retries += 1;
                    tracing::debug!(
                        dependency = %e.dependency(),
                        retry = retries,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying upstream request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if retries > 0 {
                        tracing::warn!(
                            dependency = %e.dependency(),
                            retries = retries,
                            error = %e,
                            "Upstream request failed after retries"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

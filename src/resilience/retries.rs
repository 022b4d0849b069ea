//! Retry logic.
//!
//! # Responsibilities
//! - Retry backing store calls that were rejected with a rate limit
//! - Space attempts with exponential backoff
//! - Convert an exhausted aggregate read into a degraded empty result
//!
//! # Design Decisions
//! - Only `RateLimited` is retried; every other failure returns immediately
//! - Only aggregate reads are wrapped; get/create/delete are single attempts
//! - The fallback is an explicit branch that is logged and counted

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::employees::types::EmployeeRecord;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::upstream::{EmployeeStore, UpstreamError};

/// Bounded retry with exponential backoff on rate limits.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay_ms: u64,
    multiplier: f64,
    max_delay_ms: u64,
    jitter_ratio: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        let max_attempts = if config.enabled {
            config.max_attempts.max(1)
        } else {
            1
        };
        Self {
            max_attempts,
            initial_delay_ms: config.initial_delay_ms,
            multiplier: config.multiplier,
            max_delay_ms: config.max_delay_ms,
            jitter_ratio: config.jitter_ratio,
        }
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept before retry number `retry` (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        calculate_backoff(
            retry,
            self.initial_delay_ms,
            self.multiplier,
            self.max_delay_ms,
            self.jitter_ratio,
        )
    }

    /// Run `op`, retrying while it reports `RateLimited`.
    ///
    /// Returns `RateLimited` once every attempt has been rate limited.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Err(UpstreamError::RateLimited) if attempt < self.max_attempts => {
                    let delay = self.delay_before(attempt);
                    tracing::info!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited by backing store, retrying"
                    );
                    metrics::record_retry(operation);
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// Aggregate read: list every record, degrading to an empty list when
    /// the rate limit outlasts every attempt.
    pub async fn list_all_or_empty(
        &self,
        store: &dyn EmployeeStore,
    ) -> Result<Vec<EmployeeRecord>, UpstreamError> {
        match self.run("list_all", || store.list_all()).await {
            Err(UpstreamError::RateLimited) => {
                tracing::warn!(
                    attempts = self.max_attempts,
                    "Rate limit retries exhausted, serving degraded empty employee list"
                );
                metrics::record_degraded_fallback("list_all");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

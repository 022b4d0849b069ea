//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Aggregate read (list, search, max salary, top earners, delete collision check):
//!     → retries.rs (retry RateLimited with backoff.rs delays)
//!     → on exhaustion: empty list (aggregate reads) or RateLimited (delete check)
//! ```
//!
//! # Design Decisions
//! - Only rate limits are retried; other failures surface immediately
//! - Backoff is deterministic unless jitter is configured
//! - No shared state between requests (no circuit breaker)

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;

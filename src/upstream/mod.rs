//! Backing store integration subsystem.
//!
//! # Data Flow
//! ```text
//! employees service
//!     → client.rs (EmployeeStore trait, reqwest adapter)
//!     → backing store (GET /, GET /{id}, POST /, DELETE / {name})
//!     → types.rs (envelope decoding, failure classification)
//! ```
//!
//! # Design Decisions
//! - One classification function for every operation
//! - No retries here; the resilience layer decides what to retry
//! - The trait is object safe so tests can substitute a scripted store

pub mod client;
pub mod types;

pub use client::{EmployeeStore, HttpEmployeeStore};
pub use types::{ClientBuildError, UpstreamError};

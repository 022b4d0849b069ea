//! Inbound middleware.

pub mod limits;
pub mod metrics;

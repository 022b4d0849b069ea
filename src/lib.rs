//! Employee gateway library.
//!
//! An HTTP front door over a remote employee store that only supports
//! bulk reads and delete-by-name. The gateway adds id-based access,
//! name search, salary aggregates, input validation, rate-limit retries
//! and a collision-safe delete.

pub mod config;
pub mod employees;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::GatewayConfig;
pub use employees::{EmployeeRecord, EmployeeService, GatewayError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::{EmployeeStore, HttpEmployeeStore, UpstreamError};

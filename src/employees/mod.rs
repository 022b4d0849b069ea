//! Employee domain subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → validation.rs (ids, search fragments, create payloads)
//!     → query.rs (EmployeeService: list/search/max/top earners/get/create)
//!     → resolver.rs (delete-by-id: id → name → collision check → delete-by-name)
//!     → upstream::EmployeeStore
//! ```

pub mod query;
pub mod resolver;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use query::{EmployeeService, TOP_EARNERS_LIMIT};
pub use types::{
    CreateEmployeeInput, CreateRequest, DeleteOutcome, EmployeeRecord, GatewayError, GatewayResult,
};
pub use validation::{FieldError, Violation};

//! Typed client for the employee gateway.

mod client;

pub use client::{CreateEmployee, Employee, GatewayClient, SdkError};

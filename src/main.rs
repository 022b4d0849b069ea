//! Employee gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (router, middleware) ──▶ employees (validate, aggregate, resolve)
//!                                                   │
//!                                                   ▼
//!                                resilience (rate-limit retry) ──▶ upstream ──▶ Backing store
//!
//!     Cross-cutting: config (+ hot reload), observability, lifecycle
//! ```

use clap::Parser;

use employee_gateway::lifecycle::{self, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = lifecycle::run(args).await {
        // logging may not be initialized yet when config loading fails
        eprintln!("employee-gateway: {}", e);
        tracing::error!(error = %e, "Fatal startup error");
        std::process::exit(1);
    }
}

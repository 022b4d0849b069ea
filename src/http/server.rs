//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, concurrency cap, timeout, body limit, metrics)
//! - Bind server to listener
//! - Apply configuration reloads without dropping in-flight requests
//!
//! # Design Decisions
//! - Handler state lives behind `ArcSwap`; a reload swaps it atomically and
//!   requests already running keep the snapshot they started with
//! - Listener, limits and timeouts are fixed at startup; changing them on
//!   reload is logged and takes effect after a restart

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::employees::EmployeeService;
use crate::http::handlers;
use crate::http::middleware::limits::{limit_concurrency, ConcurrencyLimit};
use crate::http::middleware::metrics::track_metrics;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::tracing::make_request_span;
use crate::resilience::RetryPolicy;
use crate::upstream::{ClientBuildError, EmployeeStore, HttpEmployeeStore};

/// Everything a handler needs, replaced as a whole on reload.
pub struct GatewayInner {
    pub config: GatewayConfig,
    pub employees: EmployeeService,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<GatewayInner>>,
}

impl AppState {
    pub fn new(config: GatewayConfig, employees: EmployeeService) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(GatewayInner { config, employees })),
        }
    }

    /// Service bound to the current configuration.
    pub fn employees(&self) -> EmployeeService {
        self.inner.load().employees.clone()
    }

    pub fn snapshot(&self) -> Arc<GatewayInner> {
        self.inner.load_full()
    }

    /// Swap in a new configuration.
    ///
    /// The store client is rebuilt only when the upstream section changed.
    /// On error the previous state stays in place.
    pub fn reload(&self, config: GatewayConfig) -> Result<(), ClientBuildError> {
        let current = self.inner.load_full();

        if config.listener != current.config.listener {
            tracing::warn!("Listener settings changed; restart required to apply them");
        }
        if config.limits != current.config.limits || config.timeouts != current.config.timeouts {
            tracing::warn!("Limit or timeout settings changed; restart required to apply them");
        }

        let store: Arc<dyn EmployeeStore> = if config.upstream == current.config.upstream {
            current.employees.store()
        } else {
            Arc::new(HttpEmployeeStore::new(&config.upstream)?)
        };
        let employees = EmployeeService::new(store, RetryPolicy::from_config(&config.retries));

        tracing::info!(
            upstream = %config.upstream.base_url,
            max_attempts = employees.retry_policy().max_attempts(),
            "Configuration reloaded"
        );
        self.inner.store(Arc::new(GatewayInner { config, employees }));
        Ok(())
    }
}

/// HTTP server for the employee gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server talking to the backing store named in `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, ClientBuildError> {
        let store = Arc::new(HttpEmployeeStore::new(&config.upstream)?);
        Ok(Self::with_store(config, store))
    }

    /// Create a server over an arbitrary store.
    pub fn with_store(config: GatewayConfig, store: Arc<dyn EmployeeStore>) -> Self {
        let employees = EmployeeService::new(store, RetryPolicy::from_config(&config.retries));
        let state = AppState::new(config.clone(), employees);
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let limit = ConcurrencyLimit::new(config.listener.max_connections);

        Router::new()
            .route("/", get(handlers::list_employees).post(handlers::create_employee))
            .route("/search", get(handlers::search_without_fragment))
            .route("/search/", get(handlers::search_without_fragment))
            .route("/search/{fragment}", get(handlers::search_employees))
            .route("/highestSalary", get(handlers::highest_salary))
            .route(
                "/topTenHighestEarningEmployeeNames",
                get(handlers::top_ten_names),
            )
            .route(
                "/{id}",
                get(handlers::get_employee).delete(handlers::delete_employee),
            )
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(limit, limit_concurrency))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` fires, applying every config from `config_updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.state.snapshot().config.upstream.base_url,
            "HTTP server starting"
        );

        let state = self.state.clone();
        let mut reload_stop = shutdown.resubscribe();
        let reloader = tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(config) = config_updates.recv() => {
                        if let Err(e) = state.reload(config) {
                            tracing::error!(error = %e, "Rejected configuration reload, keeping previous configuration");
                        }
                    }
                    _ = reload_stop.recv() => break,
                    else => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

//! Backing store client.
//!
//! # Responsibilities
//! - Issue list/get/create/delete calls against the employee store
//! - Decode the store's success and error envelopes
//! - Classify every failure uniformly (rate limit, remote error, unreachable)
//!
//! The store deletes by name only; resolving an id to a safe delete lives in
//! `employees::resolver`.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use uuid::Uuid;

use crate::config::UpstreamConfig;
use crate::employees::types::{CreateRequest, EmployeeRecord};
use crate::observability::metrics;
use crate::upstream::types::{decode, ClientBuildError, DeleteByName, Envelope, UpstreamError};

/// Operations offered by the backing store.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fetch every record.
    async fn list_all(&self) -> Result<Vec<EmployeeRecord>, UpstreamError>;

    /// Fetch one record; `Ok(None)` when the store does not know the id.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, UpstreamError>;

    /// Create a record; the store assigns `id` and `email`.
    async fn create(&self, request: &CreateRequest) -> Result<EmployeeRecord, UpstreamError>;

    /// Delete by name; `Ok(false)` when the store reports no deletion.
    async fn delete_by_name(&self, name: &str) -> Result<bool, UpstreamError>;
}

/// reqwest-backed store client bound to one base URL.
#[derive(Clone)]
pub struct HttpEmployeeStore {
    client: Client,
    base_url: Url,
}

impl HttpEmployeeStore {
    /// Build a client from upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientBuildError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        tracing::info!(base_url = %base_url, "Backing store client initialized");

        Ok(Self { client, base_url })
    }

    /// The collection URL all calls are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, id: Uuid) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// Send a request and read the whole body.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;
        Ok((status, body))
    }

    /// Record outcome and latency of one store call.
    async fn observe<T, F>(&self, operation: &'static str, call: F) -> Result<T, UpstreamError>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        let start = Instant::now();
        let result = call.await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_upstream_call(operation, outcome, start);
        tracing::debug!(
            operation,
            outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Backing store call finished"
        );
        result
    }
}

#[async_trait]
impl EmployeeStore for HttpEmployeeStore {
    async fn list_all(&self) -> Result<Vec<EmployeeRecord>, UpstreamError> {
        self.observe("list_all", async {
            let (status, body) = self.send(self.client.get(self.base_url.clone())).await?;
            let envelope: Envelope<Vec<EmployeeRecord>> = decode(status, &body)?;
            envelope.into_data(status)
        })
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, UpstreamError> {
        self.observe("get_by_id", async {
            let (status, body) = self.send(self.client.get(self.item_url(id))).await?;
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let envelope: Envelope<EmployeeRecord> = decode(status, &body)?;
            Ok(envelope.data)
        })
        .await
    }

    async fn create(&self, request: &CreateRequest) -> Result<EmployeeRecord, UpstreamError> {
        self.observe("create", async {
            let (status, body) = self
                .send(self.client.post(self.base_url.clone()).json(request))
                .await?;
            let envelope: Envelope<EmployeeRecord> = decode(status, &body)?;
            envelope.into_data(status)
        })
        .await
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, UpstreamError> {
        self.observe("delete_by_name", async {
            let request = self
                .client
                .request(Method::DELETE, self.base_url.clone())
                .json(&DeleteByName { name });
            let (status, body) = self.send(request).await?;
            let envelope: Envelope<bool> = decode(status, &body)?;
            Ok(envelope.data.unwrap_or(false))
        })
        .await
    }
}

impl std::fmt::Debug for HttpEmployeeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmployeeStore")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

//! Employee service: validated entry points and local aggregation.
//!
//! The store offers no server-side filtering, so every aggregate view
//! fetches the full record set and reduces it here. Nothing is cached:
//! each call observes a fresh snapshot.

use std::sync::Arc;

use crate::employees::resolver;
use crate::employees::types::{
    CreateEmployeeInput, DeleteOutcome, EmployeeRecord, GatewayError, GatewayResult,
};
use crate::employees::validation::{validate_create, validate_id, validate_search};
use crate::resilience::RetryPolicy;
use crate::upstream::EmployeeStore;

/// Number of names returned by the top earners view.
pub const TOP_EARNERS_LIMIT: usize = 10;

/// Records whose name contains `fragment`, ignoring case, in store order.
pub fn filter_by_name(records: Vec<EmployeeRecord>, fragment: &str) -> Vec<EmployeeRecord> {
    let needle = fragment.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}

/// Highest salary, or 0 for an empty set.
pub fn highest_salary(records: &[EmployeeRecord]) -> u32 {
    records.iter().map(|r| r.salary).max().unwrap_or(0)
}

/// Names of the `limit` best paid records, ties kept in store order.
pub fn top_earner_names(mut records: Vec<EmployeeRecord>, limit: usize) -> Vec<String> {
    // sort_by is stable
    records.sort_by(|a, b| b.salary.cmp(&a.salary));
    records.into_iter().take(limit).map(|r| r.name).collect()
}

/// Entry point for every employee operation.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    retry: RetryPolicy,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    pub fn store(&self) -> Arc<dyn EmployeeStore> {
        Arc::clone(&self.store)
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fresh snapshot through the aggregate read path (retry, then degrade).
    async fn snapshot(&self) -> GatewayResult<Vec<EmployeeRecord>> {
        Ok(self.retry.list_all_or_empty(self.store.as_ref()).await?)
    }

    pub async fn list_all(&self) -> GatewayResult<Vec<EmployeeRecord>> {
        self.snapshot().await
    }

    pub async fn search(&self, fragment: &str) -> GatewayResult<Vec<EmployeeRecord>> {
        let fragment = validate_search(fragment)?;
        Ok(filter_by_name(self.snapshot().await?, fragment))
    }

    pub async fn highest_salary(&self) -> GatewayResult<u32> {
        Ok(highest_salary(&self.snapshot().await?))
    }

    pub async fn top_earner_names(&self, limit: usize) -> GatewayResult<Vec<String>> {
        Ok(top_earner_names(self.snapshot().await?, limit))
    }

    pub async fn top_ten_earner_names(&self) -> GatewayResult<Vec<String>> {
        self.top_earner_names(TOP_EARNERS_LIMIT).await
    }

    /// Single attempt; a rate limit surfaces to the caller.
    pub async fn get_by_id(&self, raw_id: &str) -> GatewayResult<EmployeeRecord> {
        let id = validate_id(raw_id)?;
        self.store
            .get_by_id(id)
            .await?
            .ok_or(GatewayError::NotFound { id })
    }

    /// Single attempt; a rate limit surfaces to the caller.
    pub async fn create(&self, input: CreateEmployeeInput) -> GatewayResult<EmployeeRecord> {
        let request = validate_create(input)?;
        let created = self.store.create(&request).await?;
        tracing::info!(id = %created.id, "Employee created");
        Ok(created)
    }

    pub async fn delete_by_id(&self, raw_id: &str) -> GatewayResult<DeleteOutcome> {
        let id = validate_id(raw_id)?;
        resolver::delete_by_id(self.store.as_ref(), &self.retry, id).await
    }
}

impl std::fmt::Debug for EmployeeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeService")
            .field("retry", &self.retry)
            .finish()
    }
}

//! Delete-by-id on top of a delete-by-name store.
//!
//! # Protocol
//! ```text
//! id ──get_by_id──▶ record ──name──▶ list_all (retried, no empty fallback)
//!    ──exact-name matches──▶ exactly one, same id? ──delete_by_name──▶ true?
//! ```
//!
//! # Invariants
//! - A delete never reaches a record other than the requested one: if any
//!   other record holds the name, or the snapshot no longer shows the
//!   requested record under that name, no delete is issued.
//! - `delete_by_name` is called at most once per request.

use uuid::Uuid;

use crate::employees::types::{DeleteOutcome, GatewayError, GatewayResult};
use crate::resilience::RetryPolicy;
use crate::upstream::EmployeeStore;

/// Resolve `id` to its name and delete it, refusing ambiguous names.
pub async fn delete_by_id(
    store: &dyn EmployeeStore,
    retry: &RetryPolicy,
    id: Uuid,
) -> GatewayResult<DeleteOutcome> {
    let record = store
        .get_by_id(id)
        .await?
        .ok_or(GatewayError::NotFound { id })?;
    let name = record.name;

    // No empty fallback here: an empty snapshot must never satisfy the collision check.
    let snapshot = retry.run("list_all", || store.list_all()).await?;
    let holders: Vec<Uuid> = snapshot
        .iter()
        .filter(|r| r.name == name)
        .map(|r| r.id)
        .collect();

    match holders.as_slice() {
        [only] if *only == id => {}
        [] | [_] => {
            tracing::warn!(%id, name = %name, "Employee no longer holds its name, refusing delete");
            return Err(GatewayError::NotFound { id });
        }
        _ => {
            tracing::warn!(%id, name = %name, count = holders.len(), "Ambiguous name, refusing delete");
            return Err(GatewayError::AmbiguousName {
                name,
                count: holders.len(),
            });
        }
    }

    if !store.delete_by_name(&name).await? {
        tracing::error!(%id, name = %name, "Backing store reported unsuccessful delete");
        return Err(GatewayError::RemoteDeleteFailed { id });
    }

    tracing::info!(%id, name = %name, "Employee deleted");
    Ok(DeleteOutcome { id, name })
}

//! Employee domain types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::employees::validation::FieldError;
use crate::upstream::UpstreamError;

/// An employee as held by the backing store.
///
/// The gateway only ever holds request-scoped copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: Uuid,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: u32,
    #[serde(rename = "employee_age")]
    pub age: u32,
    #[serde(rename = "employee_title")]
    pub title: String,
    #[serde(rename = "employee_email", default)]
    pub email: String,
}

/// Create payload as received from callers.
///
/// Every field is optional so that a missing value can be reported
/// alongside the other violations instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: Option<String>,
    pub salary: Option<i64>,
    pub age: Option<i64>,
    pub title: Option<String>,
}

/// A validated create request, ready for transmission.
///
/// `id` and `email` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
}

/// Successful delete-by-id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub id: Uuid,
    pub name: String,
}

/// Errors surfaced by employee operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// One or more inputs were rejected before any remote call.
    #[error("validation failed: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("employee {id} not found")]
    NotFound { id: Uuid },

    /// Deleting by name would hit more than the requested record.
    #[error("refusing to delete '{name}': {count} employees share that name")]
    AmbiguousName { name: String, count: usize },

    /// The store reported an unsuccessful delete.
    #[error("backing store did not delete employee {id}")]
    RemoteDeleteFailed { id: Uuid },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for employee operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employees::validation::Violation;

    #[test]
    fn test_record_wire_shape() {
        let id = Uuid::new_v4();
        let json = serde_json::json!({
            "id": id,
            "employee_name": "Tiger Nixon",
            "employee_salary": 320800,
            "employee_age": 61,
            "employee_title": "Vice Chair Executive Principal",
            "employee_email": "tnixon@company.com",
        });

        let record: EmployeeRecord = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(record.name, "Tiger Nixon");
        assert_eq!(record.salary, 320_800);
        assert_eq!(serde_json::to_value(&record).unwrap(), json);
    }

    #[test]
    fn test_create_input_tolerates_missing_fields() {
        let input: CreateEmployeeInput = serde_json::from_str(r#"{"name":"Jill"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Jill"));
        assert!(input.salary.is_none());
        assert!(input.age.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = GatewayError::AmbiguousName {
            name: "Sam".into(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "refusing to delete 'Sam': 2 employees share that name"
        );

        let err = GatewayError::Validation(vec![
            FieldError::new("salary", Violation::Missing),
            FieldError::new("title", Violation::Blank),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: salary: is required; title: must not be blank"
        );

        let err = GatewayError::from(UpstreamError::RateLimited);
        assert_eq!(err.to_string(), "backing store rate limit exceeded");
    }
}

//! Input validation.
//!
//! # Responsibilities
//! - Reject malformed ids, blank names and out-of-range numbers
//! - Turn a loosely typed create payload into a `CreateRequest`
//!
//! # Design Decisions
//! - Pure functions, no I/O: callers validate before any store call
//! - Create payloads report every violation, not just the first
//! - Violations are structured; rendering text is left to the presentation layer

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::employees::types::{CreateEmployeeInput, CreateRequest, GatewayError, GatewayResult};

/// Youngest accepted employee age.
pub const MIN_AGE: i64 = 16;
/// Oldest accepted employee age.
pub const MAX_AGE: i64 = 75;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    Blank,
    Missing,
    Malformed,
    NotPositive,
    OutOfRange { min: i64, max: i64 },
}

impl Violation {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::Blank => "blank",
            Violation::Missing => "missing",
            Violation::Malformed => "malformed",
            Violation::NotPositive => "not_positive",
            Violation::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Blank => write!(f, "must not be blank"),
            Violation::Missing => write!(f, "is required"),
            Violation::Malformed => write!(f, "is not a valid UUID"),
            Violation::NotPositive => write!(f, "must be greater than 0"),
            Violation::OutOfRange { min, max } => write!(f, "must be between {} and {}", min, max),
        }
    }
}

/// A rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub violation: Violation,
}

impl FieldError {
    pub fn new(field: &'static str, violation: Violation) -> Self {
        Self { field, violation }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

fn reject(field: &'static str, violation: Violation) -> GatewayError {
    GatewayError::Validation(vec![FieldError::new(field, violation)])
}

/// Length of the canonical `8-4-4-4-12` id form.
const HYPHENATED_ID_LEN: usize = 36;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse an employee id, distinguishing blank from malformed input.
///
/// Only the hyphenated form is accepted; simple, braced and URN forms are malformed.
pub fn validate_id(raw: &str) -> GatewayResult<Uuid> {
    if is_blank(raw) {
        return Err(reject("id", Violation::Blank));
    }
    if raw.len() != HYPHENATED_ID_LEN {
        return Err(reject("id", Violation::Malformed));
    }
    Uuid::parse_str(raw).map_err(|_| reject("id", Violation::Malformed))
}

/// Check a name search fragment.
pub fn validate_search(fragment: &str) -> GatewayResult<&str> {
    if is_blank(fragment) {
        return Err(reject("searchString", Violation::Blank));
    }
    Ok(fragment)
}

/// Validate every field of a create payload.
pub fn validate_create(input: CreateEmployeeInput) -> GatewayResult<CreateRequest> {
    let mut errors = Vec::new();

    let name = required_text("name", input.name, &mut errors);

    let salary = match input.salary {
        None => {
            errors.push(FieldError::new("salary", Violation::Missing));
            None
        }
        Some(s) if s <= 0 => {
            errors.push(FieldError::new("salary", Violation::NotPositive));
            None
        }
        Some(s) => match u32::try_from(s) {
            Ok(s) => Some(s),
            Err(_) => {
                errors.push(FieldError::new(
                    "salary",
                    Violation::OutOfRange {
                        min: 1,
                        max: i64::from(u32::MAX),
                    },
                ));
                None
            }
        },
    };

    let age = match input.age {
        None => {
            errors.push(FieldError::new("age", Violation::Missing));
            None
        }
        // the range check guarantees the value fits
        Some(a) if (MIN_AGE..=MAX_AGE).contains(&a) => u32::try_from(a).ok(),
        Some(_) => {
            errors.push(FieldError::new(
                "age",
                Violation::OutOfRange {
                    min: MIN_AGE,
                    max: MAX_AGE,
                },
            ));
            None
        }
    };

    let title = required_text("title", input.title, &mut errors);

    match (name, salary, age, title) {
        (Some(name), Some(salary), Some(age), Some(title)) if errors.is_empty() => Ok(CreateRequest {
            name,
            salary,
            age,
            title,
        }),
        _ => Err(GatewayError::Validation(errors)),
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(v) if !is_blank(&v) => Some(v),
        _ => {
            errors.push(FieldError::new(field, Violation::Blank));
            None
        }
    }
}

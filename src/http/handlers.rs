//! Inbound route handlers.
//!
//! Handlers stay thin: extract, delegate to the current `EmployeeService`,
//! map the result. Status mapping lives in `response.rs`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::employees::{CreateEmployeeInput, EmployeeRecord};
use crate::http::response::ApiError;
use crate::http::server::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<EmployeeRecord>> {
    Ok(Json(state.employees().list_all().await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmployeeRecord> {
    Ok(Json(state.employees().get_by_id(&id).await?))
}

pub async fn search_employees(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> ApiResult<Vec<EmployeeRecord>> {
    Ok(Json(state.employees().search(&fragment).await?))
}

/// `/search` and `/search/` carry an empty fragment.
pub async fn search_without_fragment(
    State(state): State<AppState>,
) -> ApiResult<Vec<EmployeeRecord>> {
    Ok(Json(state.employees().search("").await?))
}

pub async fn highest_salary(State(state): State<AppState>) -> ApiResult<u32> {
    Ok(Json(state.employees().highest_salary().await?))
}

pub async fn top_ten_names(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(state.employees().top_ten_earner_names().await?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeInput>, JsonRejection>,
) -> ApiResult<EmployeeRecord> {
    let Json(input) = payload?;
    Ok(Json(state.employees().create(input).await?))
}

/// Responds with the deleted employee's name.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let outcome = state.employees().delete_by_id(&id).await?;
    Ok(Json(outcome.name))
}

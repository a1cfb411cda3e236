//! HTTP query surface
//!
//! Read-only endpoints consumed by the presentation layer. Every
//! collection endpoint triggers `fetch_employees` first, so the first
//! consumer to arrive starts the session load and the rest piggyback on it.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::Employee;
use crate::services::DEFAULT_TOP_N;
use crate::store::SessionSnapshot;
use crate::AppState;

/// Employee response body: stored fields plus the derived presentation
/// fields (status, avatar, formatted salary).
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDto {
    pub id: String,
    pub name: String,
    pub role: String,
    pub city: String,
    pub start_date: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub salary: f64,
    pub display_salary: String,
    pub lat: f64,
    pub lng: f64,
    pub status: &'static str,
    pub avatar_url: String,
    pub initials: String,
}

impl From<&Employee> for EmployeeDto {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            role: e.role.clone(),
            city: e.city.clone(),
            start_date: e.start_date.clone(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            department: e.department.clone(),
            salary: e.salary,
            display_salary: e.display_salary(),
            lat: e.lat,
            lng: e.lng,
            status: e.status().as_str(),
            avatar_url: e.avatar_url(),
            initials: e.initials(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub n: Option<usize>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(session))
        .route("/api/employees", get(list_employees))
        .route("/api/employees/search", get(search_employees))
        .route("/api/employees/:id", get(get_employee))
        .route("/api/stats/top-salary", get(top_salary))
        .route("/api/stats/average-salary", get(average_salary))
}

async fn health() -> Json<Value> {
    Json(json!({
        "service": "empdir",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

async fn session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.store.snapshot().await)
}

async fn list_employees(State(state): State<AppState>) -> Json<Vec<EmployeeDto>> {
    state.store.fetch_employees().await;
    let directory = state.store.directory().await;
    Json(directory.all().iter().map(EmployeeDto::from).collect())
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EmployeeDto>> {
    state.store.fetch_employees().await;
    let directory = state.store.directory().await;
    directory
        .find_by_id(&id)
        .map(|e| Json(EmployeeDto::from(e)))
        .ok_or_else(|| ApiError::NotFound(format!("No employee with id {id}")))
}

async fn search_employees(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<EmployeeDto>> {
    state.store.fetch_employees().await;
    let directory = state.store.directory().await;
    let query = params.q.unwrap_or_default();
    Json(
        directory
            .search(&query)
            .into_iter()
            .map(EmployeeDto::from)
            .collect(),
    )
}

async fn top_salary(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Json<Vec<EmployeeDto>> {
    state.store.fetch_employees().await;
    let directory = state.store.directory().await;
    let n = params.n.unwrap_or(DEFAULT_TOP_N);
    Json(
        directory
            .top_by_salary(n)
            .into_iter()
            .map(EmployeeDto::from)
            .collect(),
    )
}

async fn average_salary(State(state): State<AppState>) -> Json<Value> {
    state.store.fetch_employees().await;
    let directory = state.store.directory().await;
    Json(json!({ "average": directory.average_salary() }))
}

//! # Daybook Backend
//!
//! Contains all non-UI logic of the daybook: habits, todos, events, the
//! budget ledger and the blog, and the aggregator that merges them into calendar and
//! dashboard views.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, owner resolution, clock)
//!     ↓
//! Domain Layer (aggregation, bucketing, record services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{AggregationService, BlogService, EventService, FinanceService, HabitService, TaskService};
use crate::io::{Clock, SystemClock};
use crate::io::rest::{blog_apis, calendar_apis, dashboard_apis, event_apis, finance_apis, habit_apis, task_apis};
use crate::storage::{
    ActivityRepository, BlogRepository, DbConnection, EventRepository, FinanceRepository, HabitRepository, TaskRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub aggregation_service: AggregationService<ActivityRepository>,
    pub habit_service: HabitService,
    pub task_service: TaskService,
    pub event_service: EventService,
    pub finance_service: FinanceService,
    pub blog_service: BlogService,
    /// Owner for requests that arrive without an identity header
    pub default_user_id: String,
    /// Source of "now" for calendar and dashboard requests
    pub clock: Arc<dyn Clock>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    Ok(build_state(db_conn, config.default_user_id.clone()))
}

/// Backend over a private in-memory database
#[cfg(test)]
pub async fn initialize_test_backend() -> Result<AppState> {
    let db_conn = DbConnection::init_test().await?;
    Ok(build_state(db_conn, AppConfig::default().default_user_id))
}

fn build_state(db_conn: DbConnection, default_user_id: String) -> AppState {
    info!("Setting up domain model");
    let activity_repository = ActivityRepository::new(db_conn.clone());

    AppState {
        aggregation_service: AggregationService::new(Arc::new(activity_repository)),
        habit_service: HabitService::new(HabitRepository::new(db_conn.clone())),
        task_service: TaskService::new(TaskRepository::new(db_conn.clone())),
        event_service: EventService::new(EventRepository::new(db_conn.clone())),
        finance_service: FinanceService::new(FinanceRepository::new(db_conn.clone())),
        blog_service: BlogService::new(BlogRepository::new(db_conn)),
        default_user_id,
        clock: Arc::new(SystemClock),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health))
        .nest("/calendar", calendar_apis::router())
        .nest("/dashboard", dashboard_apis::router())
        .nest("/habits", habit_apis::router())
        .nest("/todos", task_apis::router())
        .nest("/events", event_apis::router())
        .nest("/finance", finance_apis::router())
        .nest("/blog", blog_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use shared::{CreateHabitRequest, HabitCheckRequest};
use tracing::info;

use super::errors::service_error_response;
use super::owner::Owner;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_habits).post(create_habit))
        .route("/:habit_id", delete(delete_habit))
        .route("/:habit_id/check", post(check_habit))
}

/// The owner's habits with the last week of logs
async fn list_habits(State(state): State<AppState>, owner: Owner) -> impl IntoResponse {
    info!("GET /api/habits");

    let today = state.clock.today();
    match state.habit_service.list_habits(owner.as_str(), today).await {
        Ok(habits) => (StatusCode::OK, Json(habits)).into_response(),
        Err(e) => service_error_response("List habits", e),
    }
}

async fn create_habit(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<CreateHabitRequest>,
) -> impl IntoResponse {
    info!("POST /api/habits - name: {}", request.name);

    match state.habit_service.create_habit(owner.as_str(), request).await {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => service_error_response("Create habit", e),
    }
}

async fn delete_habit(
    State(state): State<AppState>,
    owner: Owner,
    Path(habit_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/habits/{}", habit_id);

    match state.habit_service.delete_habit(owner.as_str(), &habit_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response("Delete habit", e),
    }
}

/// Toggle the day's completion, or set it when `completed` is given
async fn check_habit(
    State(state): State<AppState>,
    owner: Owner,
    Path(habit_id): Path<String>,
    Json(request): Json<HabitCheckRequest>,
) -> impl IntoResponse {
    info!("POST /api/habits/{}/check - date: {}", habit_id, request.date);

    match state.habit_service.check_in(owner.as_str(), &habit_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => service_error_response("Check habit", e),
    }
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use serde::Deserialize;
use shared::CreateEventRequest;
use tracing::info;

use super::errors::service_error_response;
use super::owner::Owner;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteEventQuery {
    pub id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_event).delete(delete_event))
}

async fn create_event(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<CreateEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/events - title: {}, date: {}", request.title, request.date);

    match state.event_service.create_event(owner.as_str(), request).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => service_error_response("Create event", e),
    }
}

async fn delete_event(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<DeleteEventQuery>,
) -> impl IntoResponse {
    info!("DELETE /api/events - query: {:?}", query);

    let id = query.id.unwrap_or_default();
    match state.event_service.delete_event(owner.as_str(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response("Delete event", e),
    }
}

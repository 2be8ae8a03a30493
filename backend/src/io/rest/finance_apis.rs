use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use shared::{CreateFinanceRequest, FinanceKind};
use tracing::{info, warn};

use super::errors::service_error_response;
use super::owner::Owner;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:kind/:id", delete(delete_transaction))
}

/// Incomes, expenses and savings merged, newest first
async fn list_transactions(State(state): State<AppState>, owner: Owner) -> impl IntoResponse {
    info!("GET /api/finance");

    match state.finance_service.list_transactions(owner.as_str()).await {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => service_error_response("List finance", e),
    }
}

async fn create_transaction(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<CreateFinanceRequest>,
) -> impl IntoResponse {
    info!("POST /api/finance - {} of {}", request.kind.as_str(), request.amount);

    match state.finance_service.create_transaction(owner.as_str(), request).await {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(e) => service_error_response("Create finance entry", e),
    }
}

async fn delete_transaction(
    State(state): State<AppState>,
    owner: Owner,
    Path((kind, id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/finance/{}/{}", kind, id);

    let kind: FinanceKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            warn!("Delete finance entry rejected: {}", e);
            return (StatusCode::BAD_REQUEST, e).into_response();
        }
    };

    match state.finance_service.delete_transaction(owner.as_str(), kind, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response("Delete finance entry", e),
    }
}

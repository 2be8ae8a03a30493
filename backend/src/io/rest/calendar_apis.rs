use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::errors::aggregation_error_response;
use super::owner::Owner;
use crate::domain::models::{AggregationError, MonthId};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    /// `YYYY-MM`; the current month when absent
    pub month: Option<String>,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_calendar_month))
}

/// Merged calendar items and day series for one month
async fn get_calendar_month(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar - query: {:?}", query);

    let today = state.clock.today();
    let month = match query.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => match raw.parse::<MonthId>() {
            Ok(month) => month,
            Err(e) => return aggregation_error_response("Calendar", AggregationError::from(e)),
        },
        None => MonthId::containing(today),
    };

    match state.aggregation_service.calendar_month(owner.as_str(), month, today).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => aggregation_error_response("Calendar", e),
    }
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::DashboardRange;
use tracing::info;

use super::errors::aggregation_error_response;
use super::owner::Owner;
use crate::domain::models::{AggregationError, WindowError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// `day`, `week` or `month`; `week` when absent
    pub range: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// Chart series and header stats for a trailing range ending now
async fn get_dashboard(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    info!("GET /api/dashboard - query: {:?}", query);

    let range = match query.range.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => match raw.parse::<DashboardRange>() {
            Ok(range) => range,
            Err(_) => {
                let err = AggregationError::from(WindowError::InvalidRange(raw.to_string()));
                return aggregation_error_response("Dashboard", err);
            }
        },
        None => DashboardRange::default(),
    };

    let now = state.clock.now();
    match state.aggregation_service.dashboard(owner.as_str(), range, now).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => aggregation_error_response("Dashboard", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::io::rest::owner::USER_ID_HEADER;
    use crate::{create_router, initialize_test_backend};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use crate::io::FixedClock;
    use chrono::NaiveDate;
    use shared::{CreateFinanceRequest, CreateHabitRequest, DashboardRange, DashboardView, FinanceKind, HabitCheckRequest};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_get_dashboard_week_by_default() -> Result<(), Box<dyn std::error::Error>> {
        let mut app_state = initialize_test_backend().await?;
        let now = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(23, 59, 30).unwrap();
        app_state.clock = Arc::new(FixedClock(now));
        let habit = app_state
            .habit_service
            .create_habit(
                "bob",
                CreateHabitRequest {
                    name: "Walk".to_string(),
                    description: None,
                    frequency: None,
                    color: None,
                },
            )
            .await?;
        app_state
            .habit_service
            .check_in(
                "bob",
                &habit.id,
                HabitCheckRequest {
                    date: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    completed: Some(true),
                },
            )
            .await?;
        app_state
            .finance_service
            .create_transaction(
                "bob",
                CreateFinanceRequest {
                    kind: FinanceKind::Income,
                    amount: 120.0,
                    category: "Freelance".to_string(),
                    description: None,
                    date: now.format("%Y-%m-%d").to_string(),
                },
            )
            .await?;
        let app = create_router(app_state, &AppConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard")
                    .method(Method::GET)
                    .header(USER_ID_HEADER, "bob")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let view: DashboardView = serde_json::from_slice(&body)?;

        assert_eq!(view.range, DashboardRange::Week);
        assert_eq!(view.series.habits.len(), 7);
        assert_eq!(view.series.habits[6].percentage, 100);
        assert_eq!(view.series.budget[6].cumulative_income, 120.0);
        assert_eq!(view.stats.habit_completion, 100);
        assert_eq!(view.stats.monthly_savings, 120.0);
        assert_eq!(view.top_habits.len(), 1);
        assert_eq!(view.top_habits[0].key, "walk");
        assert_eq!(view.series.habits[0].label, "Thu");
        assert_eq!(view.series.habits[6].label, "Wed");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_dashboard_day_has_hour_buckets() -> Result<(), Box<dyn std::error::Error>> {
        let app_state = initialize_test_backend().await?;
        let app = create_router(app_state, &AppConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/api/dashboard?range=day").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let view: DashboardView = serde_json::from_slice(&body)?;
        assert_eq!(view.series.tasks.len(), 24);
        assert_eq!(view.series.tasks[0].label, "00:00");
        assert!(view.series.tasks.iter().all(|p| p.done == 0 && p.rate == 0));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_dashboard_rejects_unknown_range() -> Result<(), Box<dyn std::error::Error>> {
        let app_state = initialize_test_backend().await?;
        let app = create_router(app_state, &AppConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/api/dashboard?range=year").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert!(String::from_utf8(body.to_vec())?.contains("year"));

        Ok(())
    }
}

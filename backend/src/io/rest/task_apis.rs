use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch},
    Router,
};
use shared::{CreateTaskRequest, UpdateTaskRequest};
use tracing::info;

use super::errors::service_error_response;
use super::owner::Owner;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", patch(update_task).delete(delete_task))
}

async fn list_tasks(State(state): State<AppState>, owner: Owner) -> impl IntoResponse {
    info!("GET /api/todos");

    match state.task_service.list_tasks(owner.as_str()).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => service_error_response("List tasks", e),
    }
}

async fn create_task(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/todos - title: {}", request.title);

    match state.task_service.create_task(owner.as_str(), request).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => service_error_response("Create task", e),
    }
}

async fn update_task(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/todos/{} - request: {:?}", id, request);

    match state.task_service.update_task(owner.as_str(), &id, request).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => service_error_response("Update task", e),
    }
}

async fn delete_task(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/todos/{}", id);

    match state.task_service.delete_task(owner.as_str(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response("Delete task", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::io::rest::owner::USER_ID_HEADER;
    use crate::{create_router, initialize_test_backend};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::json;
    use shared::{Task, TaskPriority, TaskStatus};
    use tower::ServiceExt;

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, "dave")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_task_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
        let app_state = initialize_test_backend().await?;
        let app = create_router(app_state, &AppConfig::default());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/todos",
                json!({ "title": "File taxes", "priority": "HIGH", "due_date": "2024-04-15", "tags": ["admin"] }),
            ))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let task: Task = serde_json::from_slice(&body)?;
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.due_date.is_some());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/todos/{}", task.id),
                json!({ "status": "DONE" }),
            ))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let updated: Task = serde_json::from_slice(&body)?;
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.tags, vec!["admin".to_string()]);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/todos")
                    .header(USER_ID_HEADER, "dave")
                    .body(Body::empty())?,
            )
            .await?;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let tasks: Vec<Task> = serde_json::from_slice(&body)?;
        assert_eq!(tasks.len(), 1);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/api/todos/{}", task.id))
                    .header(USER_ID_HEADER, "dave")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let app_state = initialize_test_backend().await?;
        let app = create_router(app_state, &AppConfig::default());

        let response = app
            .oneshot(json_request(Method::PATCH, "/api/todos/nope", json!({ "status": "DONE" })))
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }
}

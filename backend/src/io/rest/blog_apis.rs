use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use shared::{
    BlogReaction, CreateBlogCategoryRequest, CreateBlogPostRequest, UpdateBlogCategoryRequest, UpdateBlogPostRequest,
};
use tracing::info;

use super::errors::service_error_response;
use super::owner::Owner;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", patch(update_category).delete(delete_category))
        .route("/:id", get(get_post).patch(update_post).delete(delete_post))
        .route("/:id/like", post(like_post))
        .route("/:id/dislike", post(dislike_post))
}

async fn list_posts(State(state): State<AppState>, owner: Owner) -> impl IntoResponse {
    info!("GET /api/blog");

    match state.blog_service.list_posts(owner.as_str()).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(e) => service_error_response("List posts", e),
    }
}

async fn create_post(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<CreateBlogPostRequest>,
) -> impl IntoResponse {
    info!("POST /api/blog - title: {}", request.title);

    match state.blog_service.create_post(owner.as_str(), request).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => service_error_response("Create post", e),
    }
}

async fn get_post(State(state): State<AppState>, owner: Owner, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/blog/{}", id);

    match state.blog_service.get_post(owner.as_str(), &id).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => service_error_response("Get post", e),
    }
}

async fn update_post(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
    Json(request): Json<UpdateBlogPostRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/blog/{}", id);

    match state.blog_service.update_post(owner.as_str(), &id, request).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => service_error_response("Update post", e),
    }
}

async fn delete_post(State(state): State<AppState>, owner: Owner, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/blog/{}", id);

    match state.blog_service.delete_post(owner.as_str(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response("Delete post", e),
    }
}

async fn like_post(State(state): State<AppState>, owner: Owner, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/blog/{}/like", id);
    react(state, owner, id, BlogReaction::Like).await
}

async fn dislike_post(State(state): State<AppState>, owner: Owner, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/blog/{}/dislike", id);
    react(state, owner, id, BlogReaction::Dislike).await
}

async fn react(state: AppState, owner: Owner, id: String, reaction: BlogReaction) -> axum::response::Response {
    match state.blog_service.react(owner.as_str(), &id, reaction).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => service_error_response("React to post", e),
    }
}

async fn list_categories(State(state): State<AppState>, owner: Owner) -> impl IntoResponse {
    info!("GET /api/blog/categories");

    match state.blog_service.list_categories(owner.as_str()).await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => service_error_response("List blog categories", e),
    }
}

async fn create_category(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<CreateBlogCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/blog/categories - name: {}", request.name);

    match state.blog_service.create_category(owner.as_str(), request).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => service_error_response("Create blog category", e),
    }
}

async fn update_category(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
    Json(request): Json<UpdateBlogCategoryRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/blog/categories/{}", id);

    match state.blog_service.update_category(owner.as_str(), &id, request).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => service_error_response("Update blog category", e),
    }
}

async fn delete_category(State(state): State<AppState>, owner: Owner, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/blog/categories/{}", id);

    match state.blog_service.delete_category(owner.as_str(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_response("Delete blog category", e),
    }
}

//! HTTP handlers for the user CRUD surface.
//!
//! Handlers translate transport concerns only; every contract decision
//! (validation order, conflict semantics, not-found semantics) lives in
//! [`UserService`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::{
    app_state::AppState,
    http::error::{ApiError, AppResult},
    http::problem::ProblemDetails,
    services::UserService,
};
use shared::models::{CreateUserRequest, UpdateUserRequest, User};

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn require_pool(state: &AppState) -> Result<&SqlitePool, ApiError> {
    state
        .pool
        .as_ref()
        .ok_or_else(|| ApiError::internal_server_error("database not configured"))
}

fn record_operation(operation: &'static str) {
    metrics::counter!("user_operations_total", "operation" => operation).increment(1);
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users ordered by ascending id", body = [User]),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<User>>> {
    let pool = require_pool(&state)?;
    let service = UserService::new(pool.clone());

    let users = service.list_users().await?;
    record_operation("list");
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The requested user", body = User),
        (status = 404, description = "No user with this id", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let pool = require_pool(&state)?;
    let service = UserService::new(pool.clone());

    let user = service.get_user(id).await?;
    record_operation("get");
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation failed", body = ProblemDetails),
        (status = 409, description = "Email already in use", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "Users"
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let pool = require_pool(&state)?;
    let service = UserService::new(pool.clone());

    let created = service.create_user(payload).await?;
    record_operation("create");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation failed", body = ProblemDetails),
        (status = 404, description = "No user with this id", body = ProblemDetails),
        (status = 409, description = "Email already in use", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "Users"
)]
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let pool = require_pool(&state)?;
    let service = UserService::new(pool.clone());

    let updated = service.update_user(id, payload).await?;
    record_operation("update");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No user with this id", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let pool = require_pool(&state)?;
    let service = UserService::new(pool.clone());

    service.delete_user(id).await?;
    record_operation("delete");
    Ok(StatusCode::NO_CONTENT)
}

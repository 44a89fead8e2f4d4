use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    Country, CreateUser, CreateUserResponse, ListUsers, ServingStatus, StatusReply, UpdateUser,
    UserPage, UserResponse,
};
use crate::publisher::EventPublisher;
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user, status),
    components(schemas(
        Country,
        CreateUser,
        CreateUserResponse,
        UpdateUser,
        UserResponse,
        UserPage,
        ServingStatus,
        StatusReply
    )),
    tags(
        (name = "Users", description = "User management endpoints"),
        (name = "Status", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

/// Create the router with the user endpoints and the status probe
pub fn router<R, P>(service: UserService<R, P>) -> Router
where
    R: UserRepository + 'static,
    P: EventPublisher + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", patch(update_user).delete(delete_user))
        .route("/status", get(status))
        .with_state(shared_service)
}

/// List users, optionally filtered by country
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListUsers),
    responses(
        (status = 200, description = "One page of users", body = UserPage),
        (status = 500, description = "Storage failure")
    )
)]
async fn list_users<R: UserRepository, P: EventPublisher>(
    State(service): State<Arc<UserService<R, P>>>,
    Query(query): Query<ListUsers>,
) -> UserResult<Json<UserPage>> {
    let page = service.get_users(query).await?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = CreateUserResponse),
        (status = 400, description = "Country missing or UNKNOWN"),
        (status = 500, description = "Storage failure")
    )
)]
async fn create_user<R: UserRepository, P: EventPublisher>(
    State(service): State<Arc<UserService<R, P>>>,
    Json(input): Json<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse { user })))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Country is UNKNOWN"),
        (status = 500, description = "User missing or storage failure")
    )
)]
async fn update_user<R: UserRepository, P: EventPublisher>(
    State(service): State<Arc<UserService<R, P>>>,
    Path(id): Path<String>,
    Json(mut input): Json<UpdateUser>,
) -> UserResult<StatusCode> {
    input.id = id;
    service.update_user(input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
async fn delete_user<R: UserRepository, P: EventPublisher>(
    State(service): State<Arc<UserService<R, P>>>,
    Path(id): Path<String>,
) -> UserResult<StatusCode> {
    service.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Service liveness
#[utoipa::path(
    get,
    path = "/status",
    tag = "Status",
    responses(
        (status = 200, description = "Service is up", body = StatusReply)
    )
)]
async fn status<R: UserRepository, P: EventPublisher>(
    State(service): State<Arc<UserService<R, P>>>,
) -> Json<StatusReply> {
    Json(service.status())
}

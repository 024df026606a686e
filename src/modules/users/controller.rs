use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rollcall_core::{AppError, ErrorResponse};
use rollcall_models::{CreateUserDto, User, UserId};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::service::UserService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 422, description = "Invalid username", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    dto.validate()?;

    let user = UserService::create_user(state.store.as_ref(), dto).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users ordered by username", body = Vec<User>)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_users(state.store.as_ref()).await?;
    Ok(Json(users))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher", body = User),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let teacher = UserService::get_teacher(state.store.as_ref(), id).await?;
    Ok(Json(teacher))
}

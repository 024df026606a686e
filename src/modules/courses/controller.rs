use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rollcall_core::{AppError, ErrorResponse};
use rollcall_models::{
    AssignTeacherDto, Course, CourseId, CourseWithTeacher, CreateCourseDto, UpdateCourseDto,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::courses::service::CourseService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/admin/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Named user is not a teacher", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Course name already exists", body = ErrorResponse),
        (status = 422, description = "Invalid course name", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    Json(dto): Json<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    dto.validate()?;

    let course = CourseService::create_course(state.store.as_ref(), dto).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses",
    responses(
        (status = 200, description = "All courses with teacher names", body = Vec<CourseWithTeacher>)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseWithTeacher>>, AppError> {
    let courses = CourseService::list_courses(state.store.as_ref()).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Named user is not a teacher", body = ErrorResponse),
        (status = 404, description = "Course or teacher not found", body = ErrorResponse),
        (status = 409, description = "Course name already exists", body = ErrorResponse),
        (status = 422, description = "Invalid course name", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(dto): Json<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    dto.validate()?;

    let course = CourseService::update_course(state.store.as_ref(), id, dto).await?;

    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}/teacher",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = AssignTeacherDto,
    responses(
        (status = 200, description = "Teacher assigned", body = Course),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 404, description = "Course or user not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn assign_teacher(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(dto): Json<AssignTeacherDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::assign_teacher(state.store.as_ref(), id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/admin/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course, its enrollments and its attendance deleted"),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{Json, extract::State, http::StatusCode};
use rollcall_core::AppError;
use rollcall_models::{EnrollDto, EnrollmentSummary};
use tracing::instrument;

use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/admin/enrollments",
    request_body = EnrollDto,
    responses(
        (status = 201, description = "Student enrolled", body = EnrollmentSummary),
        (status = 400, description = "User is not a student", body = rollcall_core::ErrorResponse),
        (status = 404, description = "Student or course not found", body = rollcall_core::ErrorResponse),
        (status = 409, description = "Student already enrolled", body = rollcall_core::ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn enroll_student(
    State(state): State<AppState>,
    Json(dto): Json<EnrollDto>,
) -> Result<(StatusCode, Json<EnrollmentSummary>), AppError> {
    let summary = EnrollmentService::enroll(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/admin/enrollments",
    responses(
        (status = 200, description = "All enrollments", body = Vec<EnrollmentSummary>)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn list_enrollments(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentSummary>>, AppError> {
    let enrollments = EnrollmentService::list_enrollments(state.store.as_ref()).await?;
    Ok(Json(enrollments))
}

use axum::{Json, extract::State, http::StatusCode};
use rollcall_core::{AppError, ErrorResponse};
use rollcall_models::{MarkAttendanceEntry, MarkAttendanceResponse};
use tracing::instrument;

use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;

/// Marks a roll-call batch for today's date.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = Vec<MarkAttendanceEntry>,
    responses(
        (status = 201, description = "Every entry recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Student not enrolled", body = ErrorResponse),
        (status = 403, description = "Teacher does not own the course", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Already marked today", body = ErrorResponse),
        (status = 422, description = "Empty batch or unrecognized status", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, entries), fields(entries = entries.len()))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(entries): Json<Vec<MarkAttendanceEntry>>,
) -> Result<(StatusCode, Json<MarkAttendanceResponse>), AppError> {
    let today = state.clock.today();
    let marked = AttendanceService::mark_attendance(state.store.as_ref(), entries, today).await?;

    Ok((
        StatusCode::CREATED,
        Json(MarkAttendanceResponse {
            message: format!("Marked attendance for {} student(s)", marked.len()),
            marked,
        }),
    ))
}

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};
use rollcall_core::{AppError, ErrorResponse};
use rollcall_models::{
    AttendanceEntry, CourseAttendanceRow, CourseId, CourseSummary, DateGroup,
    RunningAttendanceResponse, StudentSummary, UserId,
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::reports::service::ReportService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/courses",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Courses taught by the teacher", body = Vec<CourseSummary>),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_courses(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses = ReportService::teacher_courses(state.store.as_ref(), id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/attendance",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Attendance across the teacher's courses", body = Vec<AttendanceEntry>),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_attendance(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<AttendanceEntry>>, AppError> {
    let history = ReportService::teacher_history(state.store.as_ref(), id).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/attendance/grouped-by-date",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Attendance grouped by date, most recent first", body = Vec<DateGroup>),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_attendance_by_date(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<DateGroup>>, AppError> {
    let groups = ReportService::teacher_history_by_date(state.store.as_ref(), id).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/attendance/grouped-by-course",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Attendance keyed by course name", body = BTreeMap<String, Vec<CourseAttendanceRow>>),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_attendance_by_course(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<BTreeMap<String, Vec<CourseAttendanceRow>>>, AppError> {
    let groups = ReportService::teacher_history_by_course(state.store.as_ref(), id).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/students",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled students", body = Vec<StudentSummary>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course_students(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let students = ReportService::course_students(state.store.as_ref(), id).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/students/unmarked",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled students not yet marked today", body = Vec<StudentSummary>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_unmarked_students(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let today = state.clock.today();
    let students = ReportService::unmarked_students(state.store.as_ref(), id, today).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/courses",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Courses the student is enrolled in", body = Vec<CourseSummary>),
        (status = 400, description = "User is not a student", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_courses(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses = ReportService::student_courses(state.store.as_ref(), id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/attendance",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student attendance history", body = Vec<AttendanceEntry>),
        (status = 400, description = "User is not a student", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<AttendanceEntry>>, AppError> {
    let history = ReportService::student_history(state.store.as_ref(), id).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/attendance/grouped-by-date",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student attendance grouped by date, most recent first", body = Vec<DateGroup>),
        (status = 400, description = "User is not a student", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_attendance_by_date(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<DateGroup>>, AppError> {
    let groups = ReportService::student_history_by_date(state.store.as_ref(), id).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/courses/{course_id}/running-attendance",
    params(
        ("id" = Uuid, Path, description = "Student ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Running attendance, or noData before the first session", body = RunningAttendanceResponse),
        (status = 400, description = "User is not a student", body = ErrorResponse),
        (status = 404, description = "Student or course not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_running_attendance(
    State(state): State<AppState>,
    Path((id, course_id)): Path<(UserId, CourseId)>,
) -> Result<Json<RunningAttendanceResponse>, AppError> {
    let running = ReportService::running_attendance(state.store.as_ref(), id, course_id).await?;
    Ok(Json(running))
}

#[utoipa::path(
    get,
    path = "/api/admin/attendance/grouped-by-date",
    responses(
        (status = 200, description = "All attendance grouped by date, most recent first", body = Vec<DateGroup>)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_all_attendance_by_date(
    State(state): State<AppState>,
) -> Result<Json<Vec<DateGroup>>, AppError> {
    let groups = ReportService::all_history_by_date(state.store.as_ref()).await?;
    Ok(Json(groups))
}

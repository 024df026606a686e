use axum::{Router, routing::get};

use crate::modules::users::controller::get_teacher;
use crate::state::AppState;

use super::controller::{
    get_all_attendance_by_date, get_course_students, get_running_attendance,
    get_student_attendance, get_student_attendance_by_date, get_student_courses,
    get_teacher_attendance, get_teacher_attendance_by_course, get_teacher_attendance_by_date,
    get_teacher_courses, get_unmarked_students,
};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_teacher))
        .route("/{id}/courses", get(get_teacher_courses))
        .route("/{id}/attendance", get(get_teacher_attendance))
        .route(
            "/{id}/attendance/grouped-by-date",
            get(get_teacher_attendance_by_date),
        )
        .route(
            "/{id}/attendance/grouped-by-course",
            get(get_teacher_attendance_by_course),
        )
}

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/courses", get(get_student_courses))
        .route("/{id}/attendance", get(get_student_attendance))
        .route(
            "/{id}/attendance/grouped-by-date",
            get(get_student_attendance_by_date),
        )
        .route(
            "/{id}/courses/{course_id}/running-attendance",
            get(get_running_attendance),
        )
}

pub fn init_course_roster_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/students", get(get_course_students))
        .route("/{id}/students/unmarked", get(get_unmarked_students))
}

pub fn init_admin_attendance_router() -> Router<AppState> {
    Router::new().route("/grouped-by-date", get(get_all_attendance_by_date))
}

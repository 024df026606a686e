use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{enroll_student, list_enrollments};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new().route("/", post(enroll_student).get(list_enrollments))
}

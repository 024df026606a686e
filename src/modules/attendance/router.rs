use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::mark_attendance;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new().route("/", post(mark_attendance))
}

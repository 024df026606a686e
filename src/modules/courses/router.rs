use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{assign_teacher, create_course, delete_course, list_courses, update_course};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route("/{id}", put(update_course).delete(delete_course))
        .route("/{id}/teacher", put(assign_teacher))
}

use axum::{
    Router,
    routing::{delete, post},
};

use crate::state::AppState;

use super::controller::{create_user, delete_user, list_users};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/{id}", delete(delete_user))
}

use axum::http::{Method, header};
use axum::{Json, Router, middleware, routing::get};
use rollcall_config::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::attendance::init_attendance_router;
use crate::modules::courses::init_courses_router;
use crate::modules::enrollments::init_enrollments_router;
use crate::modules::reports::{
    init_admin_attendance_router, init_course_roster_router, init_students_router,
    init_teachers_router,
};
use crate::modules::users::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/admin",
                    Router::new()
                        .nest("/users", init_users_router())
                        .nest("/courses", init_courses_router())
                        .nest("/enrollments", init_enrollments_router())
                        .nest("/attendance", init_admin_attendance_router()),
                )
                .nest("/attendance", init_attendance_router())
                .nest("/teachers", init_teachers_router())
                .nest("/courses", init_course_roster_router())
                .nest("/students", init_students_router()),
        )
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

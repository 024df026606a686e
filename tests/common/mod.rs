use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall_config::CorsConfig;
use rollcall_core::FixedClock;
use rollcall_db::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt;

#[allow(dead_code)]
pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The full router over an in-memory store with a pinned "today".
#[derive(Clone)]
pub struct TestApp {
    pub store: MemoryStore,
    pub today: NaiveDate,
    router: Router,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), day(2024, 1, 1))
    }

    pub fn with_store(store: MemoryStore, today: NaiveDate) -> Self {
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(FixedClock(today)),
            CorsConfig::default(),
        );

        Self {
            store,
            today,
            router: init_router(state),
        }
    }

    /// Same data, different calendar date.
    pub fn on(&self, today: NaiveDate) -> Self {
        Self::with_store(self.store.clone(), today)
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }

    /// Creates a user and returns its id.
    pub async fn user(&self, username: &str, role: &str) -> String {
        let (status, body) = self
            .post("/api/admin/users", json!({ "username": username, "role": role }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a course, optionally taught by `teacher` (a username).
    pub async fn course(&self, name: &str, teacher: Option<&str>) -> String {
        let (status, body) = self
            .post(
                "/api/admin/courses",
                json!({ "name": name, "teacherName": teacher }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create course failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn enroll(&self, student_id: &str, course_id: &str) -> (StatusCode, Value) {
        self.post(
            "/api/admin/enrollments",
            json!({ "studentId": student_id, "courseId": course_id }),
        )
        .await
    }

    pub async fn mark(&self, entries: Value) -> (StatusCode, Value) {
        self.post("/api/attendance", entries).await
    }
}

#[allow(dead_code)]
pub fn entry(teacher_id: &str, course_id: &str, student_id: &str, status: &str) -> Value {
    json!({
        "teacherId": teacher_id,
        "courseId": course_id,
        "studentId": student_id,
        "status": status,
    })
}

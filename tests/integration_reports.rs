mod common;

use axum::http::StatusCode;
use common::{TestApp, day, entry};
use rollcall_models::UserId;
use serde_json::json;

#[tokio::test]
async fn test_single_mark_grouped_by_date() {
    let app = TestApp::new();
    let teacher = app.user("T", "Teacher").await;
    let student = app.user("S", "Student").await;
    let course = app.course("C", Some("T")).await;
    app.enroll(&student, &course).await;
    app.mark(json!([entry(&teacher, &course, &student, "Present")]))
        .await;

    let (status, body) = app
        .get(&format!("/api/students/{student}/attendance/grouped-by-date"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "date": "2024-01-01",
            "courses": {
                "C": [{
                    "studentId": student,
                    "studentName": "S",
                    "teacherName": "T",
                    "status": "Present",
                }]
            },
            "totalPresent": 1,
            "totalAbsent": 0,
        }])
    );
}

#[tokio::test]
async fn test_two_students_totals_and_running_attendance() {
    let app = TestApp::new();
    let teacher = app.user("T", "Teacher").await;
    let s1 = app.user("S1", "Student").await;
    let s2 = app.user("S2", "Student").await;
    let course = app.course("C", Some("T")).await;
    app.enroll(&s1, &course).await;
    app.enroll(&s2, &course).await;
    app.mark(json!([
        entry(&teacher, &course, &s1, "Present"),
        entry(&teacher, &course, &s2, "Absent"),
    ]))
    .await;

    let (status, running) = app
        .get(&format!(
            "/api/students/{s1}/courses/{course}/running-attendance"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(running["studentName"], "S1");
    assert_eq!(running["courseName"], "C");
    assert_eq!(
        running["attendance"],
        json!({ "outcome": "percentage", "value": 100.0 })
    );

    let (_, grouped) = app
        .get(&format!("/api/teachers/{teacher}/attendance/grouped-by-date"))
        .await;
    assert_eq!(grouped.as_array().unwrap().len(), 1);
    assert_eq!(grouped[0]["totalPresent"], 1);
    assert_eq!(grouped[0]["totalAbsent"], 1);
    assert_eq!(grouped[0]["courses"]["C"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_running_attendance_before_any_session_is_no_data() {
    let app = TestApp::new();
    app.user("T", "Teacher").await;
    let student = app.user("S", "Student").await;
    let course = app.course("C", Some("T")).await;
    app.enroll(&student, &course).await;

    let (status, body) = app
        .get(&format!(
            "/api/students/{student}/courses/{course}/running-attendance"
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attendance"], json!({ "outcome": "noData" }));
}

#[tokio::test]
async fn test_running_attendance_across_days() {
    let app = TestApp::new();
    let teacher = app.user("T", "Teacher").await;
    let student = app.user("S", "Student").await;
    let course = app.course("C", Some("T")).await;
    app.enroll(&student, &course).await;

    for (d, status) in [(1, "Present"), (2, "Absent"), (3, "Present"), (4, "Present")] {
        let (code, _) = app
            .on(day(2024, 1, d))
            .mark(json!([entry(&teacher, &course, &student, status)]))
            .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (_, body) = app
        .get(&format!(
            "/api/students/{student}/courses/{course}/running-attendance"
        ))
        .await;
    assert_eq!(body["attendance"]["value"], 75.0);

    let (_, grouped) = app
        .get(&format!("/api/students/{student}/attendance/grouped-by-date"))
        .await;
    let dates: Vec<&str> = grouped
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-01-04", "2024-01-03", "2024-01-02", "2024-01-01"]
    );
}

#[tokio::test]
async fn test_teacher_views() {
    let app = TestApp::new();
    let teacher = app.user("T", "Teacher").await;
    let student = app.user("S", "Student").await;
    let math = app.course("Math", Some("T")).await;
    let art = app.course("Art", Some("T")).await;
    app.course("Music", None).await;
    app.enroll(&student, &math).await;
    app.enroll(&student, &art).await;
    app.mark(json!([
        entry(&teacher, &math, &student, "Present"),
        entry(&teacher, &art, &student, "Absent"),
    ]))
    .await;

    let (status, courses) = app.get(&format!("/api/teachers/{teacher}/courses")).await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = courses
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["courseName"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Art", "Math"]);

    let (status, history) = app.get(&format!("/api/teachers/{teacher}/attendance")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|r| r["teacherName"] == "T"));

    let (status, by_course) = app
        .get(&format!("/api/teachers/{teacher}/attendance/grouped-by-course"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        by_course["Math"],
        json!([{ "studentName": "S", "teacherName": "T", "status": "Present" }])
    );
    assert_eq!(by_course["Art"][0]["status"], "Absent");
}

#[tokio::test]
async fn test_teacher_without_courses_gets_empty_views() {
    let app = TestApp::new();
    let teacher = app.user("T", "Teacher").await;

    let (status, courses) = app.get(&format!("/api/teachers/{teacher}/courses")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses, json!([]));

    let (status, grouped) = app
        .get(&format!("/api/teachers/{teacher}/attendance/grouped-by-date"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grouped, json!([]));
}

#[tokio::test]
async fn test_invalid_ids_are_not_found_not_empty() {
    let app = TestApp::new();
    let student = app.user("S", "Student").await;
    let missing = UserId::new();

    for uri in [
        format!("/api/teachers/{missing}"),
        format!("/api/teachers/{missing}/courses"),
        format!("/api/teachers/{missing}/attendance"),
        format!("/api/teachers/{missing}/attendance/grouped-by-date"),
        format!("/api/students/{missing}/courses"),
        format!("/api/students/{missing}/attendance"),
        format!("/api/students/{missing}/attendance/grouped-by-date"),
    ] {
        let (status, body) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["kind"], "not_found", "{uri}");
    }

    // Valid student, wrong role for a teacher view.
    let (status, body) = app.get(&format!("/api/teachers/{student}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "role_mismatch");
}

#[tokio::test]
async fn test_get_teacher() {
    let app = TestApp::new();
    let teacher = app.user("T", "Teacher").await;

    let (status, body) = app.get(&format!("/api/teachers/{teacher}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "T");
    assert_eq!(body["role"], "Teacher");
}

#[tokio::test]
async fn test_admin_overview_spans_all_courses() {
    let app = TestApp::new();
    let t1 = app.user("T1", "Teacher").await;
    let t2 = app.user("T2", "Teacher").await;
    let student = app.user("S", "Student").await;
    let math = app.course("Math", Some("T1")).await;
    let art = app.course("Art", Some("T2")).await;
    app.enroll(&student, &math).await;
    app.enroll(&student, &art).await;
    app.mark(json!([entry(&t1, &math, &student, "Present")])).await;
    app.on(day(2024, 1, 2))
        .mark(json!([entry(&t2, &art, &student, "Absent")]))
        .await;

    let (status, body) = app.get("/api/admin/attendance/grouped-by-date").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["date"], "2024-01-02");
    assert_eq!(body[0]["courses"]["Art"][0]["teacherName"], "T2");
    assert_eq!(body[1]["date"], "2024-01-01");
    assert_eq!(body[1]["courses"]["Math"][0]["teacherName"], "T1");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();

    let (status, body) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Rollcall API");
    assert!(body["paths"]["/api/attendance"].is_object());
}

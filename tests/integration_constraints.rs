//! Duplicate writes that slip past the service pre-checks must still end in
//! the same `Conflict`, raised by the store's unique constraints.

mod common;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{TestApp, entry};
use rollcall::modules::attendance::AttendanceService;
use rollcall::modules::enrollments::EnrollmentService;
use rollcall_core::ErrorKind;
use rollcall_db::{MemoryStore, Store, StoreError, UnitOfWork};
use rollcall_models::{
    Attendance, Course, CourseId, EnrollDto, Enrollment, MarkAttendanceEntry, NewAttendance,
    NewCourse, NewUser, User, UserId,
};
use serde_json::json;

/// Wraps a store so existence checks for enrollments or attendance always
/// report "absent", the view a racing request gets before either commits.
#[derive(Debug)]
struct StaleReads {
    inner: MemoryStore,
    hide_enrollments: bool,
    hide_attendance: bool,
}

#[async_trait]
impl Store for StaleReads {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(StaleUnit {
            inner: self.inner.begin().await?,
            hide_enrollments: self.hide_enrollments,
            hide_attendance: self.hide_attendance,
        }))
    }
}

struct StaleUnit {
    inner: Box<dyn UnitOfWork>,
    hide_enrollments: bool,
    hide_attendance: bool,
}

#[async_trait]
impl UnitOfWork for StaleUnit {
    async fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        self.inner.get_user(id).await
    }

    async fn get_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        self.inner.get_user_by_username(username).await
    }

    async fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        self.inner.list_users().await
    }

    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        self.inner.create_user(user).await
    }

    async fn delete_user(&mut self, id: UserId) -> Result<bool, StoreError> {
        self.inner.delete_user(id).await
    }

    async fn get_course(&mut self, id: CourseId) -> Result<Option<Course>, StoreError> {
        self.inner.get_course(id).await
    }

    async fn get_course_by_name(&mut self, name: &str) -> Result<Option<Course>, StoreError> {
        self.inner.get_course_by_name(name).await
    }

    async fn list_courses(&mut self) -> Result<Vec<Course>, StoreError> {
        self.inner.list_courses().await
    }

    async fn list_courses_by_teacher(
        &mut self,
        teacher_id: UserId,
    ) -> Result<Vec<Course>, StoreError> {
        self.inner.list_courses_by_teacher(teacher_id).await
    }

    async fn create_course(&mut self, course: NewCourse) -> Result<Course, StoreError> {
        self.inner.create_course(course).await
    }

    async fn update_course(&mut self, course: &Course) -> Result<(), StoreError> {
        self.inner.update_course(course).await
    }

    async fn unassign_teacher(&mut self, teacher_id: UserId) -> Result<u64, StoreError> {
        self.inner.unassign_teacher(teacher_id).await
    }

    async fn delete_course(&mut self, id: CourseId) -> Result<bool, StoreError> {
        self.inner.delete_course(id).await
    }

    async fn get_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StoreError> {
        if self.hide_enrollments {
            return Ok(None);
        }
        self.inner.get_enrollment(student_id, course_id).await
    }

    async fn list_enrollments(&mut self) -> Result<Vec<Enrollment>, StoreError> {
        self.inner.list_enrollments().await
    }

    async fn list_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        self.inner.list_enrollments_by_student(student_id).await
    }

    async fn list_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        self.inner.list_enrollments_by_course(course_id).await
    }

    async fn create_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, StoreError> {
        self.inner.create_enrollment(student_id, course_id).await
    }

    async fn delete_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<u64, StoreError> {
        self.inner.delete_enrollments_by_student(student_id).await
    }

    async fn delete_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<u64, StoreError> {
        self.inner.delete_enrollments_by_course(course_id).await
    }

    async fn get_attendance(
        &mut self,
        course_id: CourseId,
        student_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        if self.hide_attendance {
            return Ok(None);
        }
        self.inner.get_attendance(course_id, student_id, date).await
    }

    async fn list_attendance(&mut self) -> Result<Vec<Attendance>, StoreError> {
        self.inner.list_attendance().await
    }

    async fn list_attendance_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Attendance>, StoreError> {
        self.inner.list_attendance_by_student(student_id).await
    }

    async fn list_attendance_by_courses(
        &mut self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Attendance>, StoreError> {
        self.inner.list_attendance_by_courses(course_ids).await
    }

    async fn list_attendance_by_course_on(
        &mut self,
        course_id: CourseId,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        self.inner.list_attendance_by_course_on(course_id, date).await
    }

    async fn create_attendance(&mut self, record: NewAttendance) -> Result<Attendance, StoreError> {
        self.inner.create_attendance(record).await
    }

    async fn delete_attendance_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<u64, StoreError> {
        self.inner.delete_attendance_by_course(course_id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.inner.commit().await
    }
}

#[tokio::test]
async fn test_duplicate_enrollment_past_precheck_is_conflict() {
    let app = TestApp::new();
    let student = app.user("ann", "Student").await;
    let course = app.course("Math", None).await;
    app.enroll(&student, &course).await;

    let store = StaleReads {
        inner: app.store.clone(),
        hide_enrollments: true,
        hide_attendance: false,
    };
    let err = EnrollmentService::enroll(
        &store,
        EnrollDto {
            student_id: student.parse().unwrap(),
            course_id: course.parse().unwrap(),
        },
    )
    .await
    .unwrap_err();

    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(err.error.to_string(), "Student is already enrolled in this course");

    let (_, enrollments) = app.get("/api/admin/enrollments").await;
    assert_eq!(enrollments.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_attendance_past_precheck_is_conflict() {
    let app = TestApp::new();
    let teacher = app.user("mr_t", "Teacher").await;
    let s1 = app.user("ann", "Student").await;
    let s2 = app.user("bob", "Student").await;
    let course = app.course("Math", Some("mr_t")).await;
    app.enroll(&s1, &course).await;
    app.enroll(&s2, &course).await;
    app.mark(json!([entry(&teacher, &course, &s1, "Present")]))
        .await;

    let store = StaleReads {
        inner: app.store.clone(),
        hide_enrollments: false,
        hide_attendance: true,
    };
    let mark = |student: &str, status: &str| MarkAttendanceEntry {
        teacher_id: teacher.parse().unwrap(),
        course_id: course.parse().unwrap(),
        student_id: student.parse().unwrap(),
        status: status.to_string(),
    };
    let err = AttendanceService::mark_attendance(
        &store,
        vec![mark(&s2, "Present"), mark(&s1, "Absent")],
        app.today,
    )
    .await
    .unwrap_err();

    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(err.error.to_string(), "Attendance already marked today");
    assert_eq!(err.entry, Some(1));

    // bob's entry was rolled back with the batch.
    let (_, unmarked) = app
        .get(&format!("/api/courses/{course}/students/unmarked"))
        .await;
    assert_eq!(unmarked[0]["studentName"], "bob");
}

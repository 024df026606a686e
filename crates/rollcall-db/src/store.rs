//! The persistence boundary.
//!
//! Components never talk to a database directly. They receive a [`Store`] at
//! construction time, open a [`UnitOfWork`] per request and either commit it
//! or drop it. Dropping an uncommitted unit of work discards every write made
//! through it.
//!
//! Every lookup distinguishes "does not exist" (`Ok(None)`) from failure.
//! Implementations must enforce these constraints themselves:
//!
//! - one user per username, one course per name
//! - one enrollment per (student, course)
//! - one attendance record per (course, student, date)
//! - enrollments reference existing users and courses; attendance references
//!   an existing course

use async_trait::async_trait;
use chrono::NaiveDate;
use rollcall_models::{
    Attendance, Course, CourseId, Enrollment, NewAttendance, NewCourse, NewUser, User, UserId,
};

use crate::error::StoreError;

#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Opens a new atomic unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;
}

#[async_trait]
pub trait UnitOfWork: Send {
    // Users
    async fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError>;
    async fn get_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&mut self) -> Result<Vec<User>, StoreError>;
    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError>;
    /// Returns whether a row was deleted.
    async fn delete_user(&mut self, id: UserId) -> Result<bool, StoreError>;

    // Courses
    async fn get_course(&mut self, id: CourseId) -> Result<Option<Course>, StoreError>;
    async fn get_course_by_name(&mut self, name: &str) -> Result<Option<Course>, StoreError>;
    async fn list_courses(&mut self) -> Result<Vec<Course>, StoreError>;
    async fn list_courses_by_teacher(
        &mut self,
        teacher_id: UserId,
    ) -> Result<Vec<Course>, StoreError>;
    async fn create_course(&mut self, course: NewCourse) -> Result<Course, StoreError>;
    /// Persists `name` and `teacher_id` of an existing course.
    async fn update_course(&mut self, course: &Course) -> Result<(), StoreError>;
    /// Sets `teacher_id` to null on every course taught by `teacher_id`.
    async fn unassign_teacher(&mut self, teacher_id: UserId) -> Result<u64, StoreError>;
    async fn delete_course(&mut self, id: CourseId) -> Result<bool, StoreError>;

    // Enrollments
    async fn get_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StoreError>;
    async fn list_enrollments(&mut self) -> Result<Vec<Enrollment>, StoreError>;
    async fn list_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Enrollment>, StoreError>;
    async fn list_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, StoreError>;
    async fn create_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, StoreError>;
    async fn delete_enrollments_by_student(&mut self, student_id: UserId)
    -> Result<u64, StoreError>;
    async fn delete_enrollments_by_course(&mut self, course_id: CourseId)
    -> Result<u64, StoreError>;

    // Attendance
    async fn get_attendance(
        &mut self,
        course_id: CourseId,
        student_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError>;
    async fn list_attendance(&mut self) -> Result<Vec<Attendance>, StoreError>;
    async fn list_attendance_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Attendance>, StoreError>;
    async fn list_attendance_by_courses(
        &mut self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Attendance>, StoreError>;
    async fn list_attendance_by_course_on(
        &mut self,
        course_id: CourseId,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError>;
    async fn create_attendance(&mut self, record: NewAttendance)
    -> Result<Attendance, StoreError>;
    async fn delete_attendance_by_course(&mut self, course_id: CourseId)
    -> Result<u64, StoreError>;

    /// Makes every write of this unit visible atomically.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

//! In-process store used by tests and `STORE_BACKEND=memory`.
//!
//! A unit of work holds the table lock for its whole lifetime and writes to a
//! staged copy of the tables. `commit` swaps the copy in; dropping the unit
//! discards it. Units are therefore fully serialized.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rollcall_models::{
    Attendance, AttendanceId, Course, CourseId, Enrollment, EnrollmentId, NewAttendance,
    NewCourse, NewUser, User, UserId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::StoreError;
use crate::store::{Store, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<User>,
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    attendance: Vec<Attendance>,
}

impl Tables {
    fn user_exists(&self, id: UserId) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn course_exists(&self, id: CourseId) -> bool {
        self.courses.iter().any(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.staged.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .staged
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        let mut users = self.staged.users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        if self
            .staged
            .users
            .iter()
            .any(|u| u.username == user.username)
        {
            return Err(StoreError::unique("users_username_key"));
        }

        let created = User {
            id: UserId::new(),
            username: user.username,
            role: user.role,
            created_at: Utc::now(),
        };
        self.staged.users.push(created.clone());
        Ok(created)
    }

    async fn delete_user(&mut self, id: UserId) -> Result<bool, StoreError> {
        if self.staged.enrollments.iter().any(|e| e.student_id == id) {
            return Err(StoreError::foreign_key("enrollments_student_id_fkey"));
        }
        if self.staged.courses.iter().any(|c| c.teacher_id == Some(id)) {
            return Err(StoreError::foreign_key("courses_teacher_id_fkey"));
        }

        let before = self.staged.users.len();
        self.staged.users.retain(|u| u.id != id);
        Ok(self.staged.users.len() < before)
    }

    async fn get_course(&mut self, id: CourseId) -> Result<Option<Course>, StoreError> {
        Ok(self.staged.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn get_course_by_name(&mut self, name: &str) -> Result<Option<Course>, StoreError> {
        Ok(self
            .staged
            .courses
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_courses(&mut self) -> Result<Vec<Course>, StoreError> {
        let mut courses = self.staged.courses.clone();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }

    async fn list_courses_by_teacher(
        &mut self,
        teacher_id: UserId,
    ) -> Result<Vec<Course>, StoreError> {
        let mut courses: Vec<Course> = self
            .staged
            .courses
            .iter()
            .filter(|c| c.teacher_id == Some(teacher_id))
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }

    async fn create_course(&mut self, course: NewCourse) -> Result<Course, StoreError> {
        if self.staged.courses.iter().any(|c| c.name == course.name) {
            return Err(StoreError::unique("courses_name_key"));
        }
        if let Some(teacher_id) = course.teacher_id
            && !self.staged.user_exists(teacher_id)
        {
            return Err(StoreError::foreign_key("courses_teacher_id_fkey"));
        }

        let created = Course {
            id: CourseId::new(),
            name: course.name,
            teacher_id: course.teacher_id,
            created_at: Utc::now(),
        };
        self.staged.courses.push(created.clone());
        Ok(created)
    }

    async fn update_course(&mut self, course: &Course) -> Result<(), StoreError> {
        if self
            .staged
            .courses
            .iter()
            .any(|c| c.name == course.name && c.id != course.id)
        {
            return Err(StoreError::unique("courses_name_key"));
        }
        if let Some(teacher_id) = course.teacher_id
            && !self.staged.user_exists(teacher_id)
        {
            return Err(StoreError::foreign_key("courses_teacher_id_fkey"));
        }

        if let Some(existing) = self.staged.courses.iter_mut().find(|c| c.id == course.id) {
            existing.name = course.name.clone();
            existing.teacher_id = course.teacher_id;
        }
        Ok(())
    }

    async fn unassign_teacher(&mut self, teacher_id: UserId) -> Result<u64, StoreError> {
        let mut count = 0;
        for course in self
            .staged
            .courses
            .iter_mut()
            .filter(|c| c.teacher_id == Some(teacher_id))
        {
            course.teacher_id = None;
            count += 1;
        }
        Ok(count)
    }

    async fn delete_course(&mut self, id: CourseId) -> Result<bool, StoreError> {
        if self.staged.enrollments.iter().any(|e| e.course_id == id) {
            return Err(StoreError::foreign_key("enrollments_course_id_fkey"));
        }
        if self.staged.attendance.iter().any(|a| a.course_id == id) {
            return Err(StoreError::foreign_key("attendance_course_id_fkey"));
        }

        let before = self.staged.courses.len();
        self.staged.courses.retain(|c| c.id != id);
        Ok(self.staged.courses.len() < before)
    }

    async fn get_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .staged
            .enrollments
            .iter()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn list_enrollments(&mut self) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self.staged.enrollments.clone())
    }

    async fn list_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self
            .staged
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self
            .staged
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn create_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, StoreError> {
        if !self.staged.user_exists(student_id) {
            return Err(StoreError::foreign_key("enrollments_student_id_fkey"));
        }
        if !self.staged.course_exists(course_id) {
            return Err(StoreError::foreign_key("enrollments_course_id_fkey"));
        }
        if self
            .staged
            .enrollments
            .iter()
            .any(|e| e.student_id == student_id && e.course_id == course_id)
        {
            return Err(StoreError::unique("enrollments_student_course_key"));
        }

        let created = Enrollment {
            id: EnrollmentId::new(),
            student_id,
            course_id,
            created_at: Utc::now(),
        };
        self.staged.enrollments.push(created.clone());
        Ok(created)
    }

    async fn delete_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<u64, StoreError> {
        let before = self.staged.enrollments.len();
        self.staged.enrollments.retain(|e| e.student_id != student_id);
        Ok((before - self.staged.enrollments.len()) as u64)
    }

    async fn delete_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<u64, StoreError> {
        let before = self.staged.enrollments.len();
        self.staged.enrollments.retain(|e| e.course_id != course_id);
        Ok((before - self.staged.enrollments.len()) as u64)
    }

    async fn get_attendance(
        &mut self,
        course_id: CourseId,
        student_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        Ok(self
            .staged
            .attendance
            .iter()
            .find(|a| a.course_id == course_id && a.student_id == student_id && a.date == date)
            .cloned())
    }

    async fn list_attendance(&mut self) -> Result<Vec<Attendance>, StoreError> {
        Ok(newest_first(self.staged.attendance.iter()))
    }

    async fn list_attendance_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Attendance>, StoreError> {
        Ok(newest_first(
            self.staged
                .attendance
                .iter()
                .filter(|a| a.student_id == student_id),
        ))
    }

    async fn list_attendance_by_courses(
        &mut self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Attendance>, StoreError> {
        Ok(newest_first(
            self.staged
                .attendance
                .iter()
                .filter(|a| course_ids.contains(&a.course_id)),
        ))
    }

    async fn list_attendance_by_course_on(
        &mut self,
        course_id: CourseId,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        Ok(self
            .staged
            .attendance
            .iter()
            .filter(|a| a.course_id == course_id && a.date == date)
            .cloned()
            .collect())
    }

    async fn create_attendance(
        &mut self,
        record: NewAttendance,
    ) -> Result<Attendance, StoreError> {
        if !self.staged.course_exists(record.course_id) {
            return Err(StoreError::foreign_key("attendance_course_id_fkey"));
        }
        if self.staged.attendance.iter().any(|a| {
            a.course_id == record.course_id
                && a.student_id == record.student_id
                && a.date == record.date
        }) {
            return Err(StoreError::unique("attendance_course_student_date_key"));
        }

        let created = Attendance {
            id: AttendanceId::new(),
            course_id: record.course_id,
            student_id: record.student_id,
            date: record.date,
            status: record.status,
            created_at: Utc::now(),
        };
        self.staged.attendance.push(created.clone());
        Ok(created)
    }

    async fn delete_attendance_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<u64, StoreError> {
        let before = self.staged.attendance.len();
        self.staged.attendance.retain(|a| a.course_id != course_id);
        Ok((before - self.staged.attendance.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

/// Date descending, insertion order within a date.
fn newest_first<'a>(records: impl Iterator<Item = &'a Attendance>) -> Vec<Attendance> {
    let mut records: Vec<Attendance> = records.cloned().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

//! PostgreSQL-backed store.
//!
//! Each unit of work wraps one SQLx transaction. Uniqueness and foreign keys
//! are enforced by the schema in `migrations/`, so racing requests that both
//! pass a service pre-check still end with exactly one winner.

use async_trait::async_trait;
use chrono::NaiveDate;
use rollcall_models::{
    Attendance, Course, CourseId, Enrollment, NewAttendance, NewCourse, NewUser, User, UserId,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::store::{Store, UnitOfWork};

const USER_COLUMNS: &str = "id, username, role, created_at";
const COURSE_COLUMNS: &str = "id, name, teacher_id, created_at";
const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id, created_at";
const ATTENDANCE_COLUMNS: &str = "id, course_id, student_id, date, status, created_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn get_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn get_user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(user)
    }

    async fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self, user), fields(db.system = "postgresql", user.username = %user.username))]
    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, role) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(user.role)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn delete_user(&mut self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn get_course(&mut self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(course)
    }

    async fn get_course_by_name(&mut self, name: &str) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(course)
    }

    async fn list_courses(&mut self) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY name"
        ))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn list_courses_by_teacher(
        &mut self,
        teacher_id: UserId,
    ) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE teacher_id = $1 ORDER BY name"
        ))
        .bind(teacher_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(self, course), fields(db.system = "postgresql", course.name = %course.name))]
    async fn create_course(&mut self, course: NewCourse) -> Result<Course, StoreError> {
        let created = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (name, teacher_id) VALUES ($1, $2) RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&course.name)
        .bind(course.teacher_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(created)
    }

    async fn update_course(&mut self, course: &Course) -> Result<(), StoreError> {
        sqlx::query("UPDATE courses SET name = $1, teacher_id = $2 WHERE id = $3")
            .bind(&course.name)
            .bind(course.teacher_id)
            .bind(course.id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn unassign_teacher(&mut self, teacher_id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE courses SET teacher_id = NULL WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn delete_course(&mut self, id: CourseId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2"
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(enrollment)
    }

    async fn list_enrollments(&mut self) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments ORDER BY created_at"
        ))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(enrollments)
    }

    async fn list_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 ORDER BY created_at"
        ))
        .bind(student_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(enrollments)
    }

    async fn list_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE course_id = $1 ORDER BY created_at"
        ))
        .bind(course_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(enrollments)
    }

    #[instrument(skip(self), fields(db.system = "postgresql"))]
    async fn create_enrollment(
        &mut self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(enrollment)
    }

    async fn delete_enrollments_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_enrollments_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn get_attendance(
        &mut self,
        course_id: CourseId,
        student_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        let record = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE course_id = $1 AND student_id = $2 AND date = $3"
        ))
        .bind(course_id)
        .bind(student_id)
        .bind(date)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(record)
    }

    async fn list_attendance(&mut self) -> Result<Vec<Attendance>, StoreError> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance ORDER BY date DESC, created_at"
        ))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(records)
    }

    async fn list_attendance_by_student(
        &mut self,
        student_id: UserId,
    ) -> Result<Vec<Attendance>, StoreError> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE student_id = $1 ORDER BY date DESC, created_at"
        ))
        .bind(student_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(records)
    }

    async fn list_attendance_by_courses(
        &mut self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Attendance>, StoreError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE course_id = ANY($1) ORDER BY date DESC, created_at"
        ))
        .bind(course_ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(records)
    }

    async fn list_attendance_by_course_on(
        &mut self,
        course_id: CourseId,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance
             WHERE course_id = $1 AND date = $2 ORDER BY created_at"
        ))
        .bind(course_id)
        .bind(date)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(records)
    }

    #[instrument(skip(self, record), fields(db.system = "postgresql", course_id = %record.course_id, student_id = %record.student_id))]
    async fn create_attendance(
        &mut self,
        record: NewAttendance,
    ) -> Result<Attendance, StoreError> {
        let created = sqlx::query_as::<_, Attendance>(&format!(
            "INSERT INTO attendance (course_id, student_id, date, status)
             VALUES ($1, $2, $3, $4) RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(record.course_id)
        .bind(record.student_id)
        .bind(record.date)
        .bind(&record.status)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(created)
    }

    async fn delete_attendance_by_course(
        &mut self,
        course_id: CourseId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM attendance WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let PgUnitOfWork { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}

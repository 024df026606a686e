use anyhow::anyhow;
use rollcall_core::AppError;
use rollcall_db::{Store, UnitOfWork};
use rollcall_models::{CourseId, EnrollDto, EnrollmentSummary, User, UserId, reports::UNKNOWN_STUDENT};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::metrics;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls a student in a course.
    ///
    /// Rejects with `NotFound` for an unknown student or course,
    /// `RoleMismatch` when the user is not a student and `Conflict` when the
    /// pair is already enrolled. A concurrent enrollment that slips past the
    /// pre-check hits the store's unique constraint and gets the same
    /// `Conflict`.
    #[instrument(skip(store, dto), fields(student_id = %dto.student_id, course_id = %dto.course_id))]
    pub async fn enroll(store: &dyn Store, dto: EnrollDto) -> Result<EnrollmentSummary, AppError> {
        let mut uow = store.begin().await?;

        let student = uow
            .get_user(dto.student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;
        let course = uow
            .get_course(dto.course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if !student.is_student() {
            return Err(AppError::role_mismatch(anyhow!(
                "User '{}' is not a student",
                student.username
            )));
        }

        if uow.get_enrollment(student.id, course.id).await?.is_some() {
            warn!("Duplicate enrollment rejected");
            return Err(already_enrolled());
        }

        uow.create_enrollment(student.id, course.id)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    already_enrolled()
                } else {
                    AppError::from(e)
                }
            })?;

        uow.commit().await?;
        metrics::track_enrollment_created();
        info!("Student enrolled");

        Ok(EnrollmentSummary {
            student_id: student.id,
            student_name: student.username,
            course_id: course.id,
            course_name: course.name,
        })
    }

    #[instrument(skip(store))]
    pub async fn list_enrollments(store: &dyn Store) -> Result<Vec<EnrollmentSummary>, AppError> {
        let mut uow = store.begin().await?;

        let users: HashMap<UserId, User> = uow
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let courses: HashMap<CourseId, String> = uow
            .list_courses()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let summaries = uow
            .list_enrollments()
            .await?
            .into_iter()
            .map(|e| EnrollmentSummary {
                student_id: e.student_id,
                student_name: users
                    .get(&e.student_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_else(|| UNKNOWN_STUDENT.to_string()),
                course_id: e.course_id,
                course_name: courses.get(&e.course_id).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(summaries)
    }

    /// Removes every enrollment of a student. Runs inside the caller's unit of
    /// work so the owning delete commits or fails with it.
    pub async fn cascade_delete_for_student(
        uow: &mut dyn UnitOfWork,
        student_id: UserId,
    ) -> Result<u64, AppError> {
        let removed = uow.delete_enrollments_by_student(student_id).await?;
        info!(%student_id, removed, "Cascaded student enrollments");
        Ok(removed)
    }

    /// Removes every enrollment of a course inside the caller's unit of work.
    pub async fn cascade_delete_for_course(
        uow: &mut dyn UnitOfWork,
        course_id: CourseId,
    ) -> Result<u64, AppError> {
        let removed = uow.delete_enrollments_by_course(course_id).await?;
        info!(%course_id, removed, "Cascaded course enrollments");
        Ok(removed)
    }

    /// Resolves `id` to a student: `NotFound` when absent, `RoleMismatch`
    /// when the user has another role.
    pub async fn require_student(uow: &mut dyn UnitOfWork, id: UserId) -> Result<User, AppError> {
        let user = uow
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        if !user.is_student() {
            return Err(AppError::role_mismatch(anyhow!(
                "User '{}' is not a student",
                user.username
            )));
        }

        Ok(user)
    }
}

fn already_enrolled() -> AppError {
    AppError::conflict(anyhow!("Student is already enrolled in this course"))
}

use anyhow::anyhow;
use chrono::NaiveDate;
use rollcall_core::AppError;
use rollcall_db::{Store, UnitOfWork};
use rollcall_models::{Attendance, AttendanceStatus, MarkAttendanceEntry, NewAttendance};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::metrics;

pub struct AttendanceService;

impl AttendanceService {
    /// Records a teacher's roll-call batch for `date`.
    ///
    /// The batch is all-or-nothing: every entry is checked and written in one
    /// unit of work, and the first rejected entry rolls the whole batch back.
    /// The returned error carries that entry's index.
    #[instrument(skip(store, entries), fields(entries = entries.len(), %date))]
    pub async fn mark_attendance(
        store: &dyn Store,
        entries: Vec<MarkAttendanceEntry>,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError> {
        if entries.is_empty() {
            return Err(AppError::unprocessable(anyhow!(
                "Attendance batch must contain at least one entry"
            )));
        }

        let mut uow = store.begin().await?;
        let mut marked = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            let record = Self::mark_entry(uow.as_mut(), entry, date)
                .await
                .map_err(|e| reject(e, index))?;
            marked.push(record);
        }

        uow.commit().await?;

        for record in &marked {
            if let Some(status) = AttendanceStatus::classify(&record.status) {
                metrics::track_attendance_marked(status);
            }
        }
        info!(marked = marked.len(), "Attendance batch committed");

        Ok(marked)
    }

    /// Runs one entry through authorization, status, enrollment and
    /// once-per-day checks, then writes it.
    async fn mark_entry(
        uow: &mut dyn UnitOfWork,
        entry: MarkAttendanceEntry,
        date: NaiveDate,
    ) -> Result<Attendance, AppError> {
        let course = uow
            .get_course(entry.course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if !course.is_taught_by(entry.teacher_id) {
            return Err(AppError::forbidden(anyhow!(
                "Not authorized to mark attendance for this course"
            )));
        }

        entry.validate()?;

        if uow
            .get_enrollment(entry.student_id, entry.course_id)
            .await?
            .is_none()
        {
            return Err(AppError::invalid_state(anyhow!(
                "Student is not enrolled in this course"
            )));
        }

        if uow
            .get_attendance(entry.course_id, entry.student_id, date)
            .await?
            .is_some()
        {
            return Err(already_marked());
        }

        // An enrollment exists, so a missing student means the store is inconsistent.
        let student = uow.get_user(entry.student_id).await?.ok_or_else(|| {
            AppError::integrity(anyhow!(
                "Enrolled student {} does not exist",
                entry.student_id
            ))
        })?;

        if !student.is_student() {
            return Err(AppError::role_mismatch(anyhow!(
                "User '{}' is not a student",
                student.username
            )));
        }

        uow.create_attendance(NewAttendance {
            course_id: course.id,
            student_id: student.id,
            date,
            status: entry.status,
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                already_marked()
            } else {
                AppError::from(e)
            }
        })
    }
}

fn already_marked() -> AppError {
    AppError::conflict(anyhow!("Attendance already marked today"))
}

fn reject(err: AppError, index: usize) -> AppError {
    warn!(entry = index, kind = err.kind.as_str(), error = %err.error, "Attendance entry rejected");
    metrics::track_attendance_rejected(err.kind.as_str());
    err.at_entry(index)
}

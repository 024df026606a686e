//! Attendance domain models and DTOs.
//!
//! An attendance record is one immutable (course, student, date, status)
//! observation. The status is stored exactly as submitted; comparisons
//! against "Present"/"Absent" ignore case.

use crate::ids::{AttendanceId, CourseId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Recognized attendance statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Case-insensitive classification of a stored status string.
    pub fn classify(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("present") {
            Some(AttendanceStatus::Present)
        } else if raw.eq_ignore_ascii_case("absent") {
            Some(AttendanceStatus::Absent)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    pub course_id: CourseId,
    pub student_id: UserId,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Attendance {
    pub fn is_present(&self) -> bool {
        AttendanceStatus::classify(&self.status) == Some(AttendanceStatus::Present)
    }

    pub fn is_absent(&self) -> bool {
        AttendanceStatus::classify(&self.status) == Some(AttendanceStatus::Absent)
    }
}

/// Fields required to insert an attendance record.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub course_id: CourseId,
    pub student_id: UserId,
    pub date: NaiveDate,
    pub status: String,
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    match AttendanceStatus::classify(status) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("status");
            err.message = Some("status must be Present or Absent".into());
            Err(err)
        }
    }
}

/// One entry of a teacher's roll-call batch.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceEntry {
    pub teacher_id: UserId,
    pub course_id: CourseId,
    pub student_id: UserId,
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceResponse {
    pub message: String,
    pub marked: Vec<Attendance>,
}

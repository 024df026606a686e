//! Enrollment domain models and DTOs.
//!
//! An enrollment is the (student, course) membership fact. At most one exists
//! per pair, and it must exist before attendance can be marked.

use crate::ids::{CourseId, EnrollmentId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollDto {
    pub student_id: UserId,
    pub course_id: CourseId,
}

/// Denormalized view of an enrollment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
    pub student_id: UserId,
    pub student_name: String,
    pub course_id: CourseId,
    pub course_name: String,
}

/// A student as seen from a course roster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: UserId,
    pub student_name: String,
}

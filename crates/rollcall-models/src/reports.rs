//! Attendance report shapes.
//!
//! Raw [`Attendance`](crate::attendance::Attendance) rows are resolved into
//! [`AttendanceEntry`] values (names filled in) before they are grouped.

use crate::ids::{CourseId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Teacher label for a course without a teacher.
pub const NO_TEACHER: &str = "None";
/// Teacher label for a teacher id that no longer resolves to a user.
pub const UNKNOWN_TEACHER: &str = "Unknown";
/// Student label for a student id that no longer resolves to a user.
pub const UNKNOWN_STUDENT: &str = "Unknown";

/// An attendance record with course, student and teacher names resolved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub course_id: CourseId,
    pub course_name: String,
    pub student_id: UserId,
    pub student_name: String,
    pub teacher_name: String,
    pub date: NaiveDate,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupedRecord {
    pub student_id: UserId,
    pub student_name: String,
    pub teacher_name: String,
    pub status: String,
}

/// All records of one date, partitioned by course name.
///
/// The totals span every course of the date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup {
    pub date: NaiveDate,
    pub courses: BTreeMap<String, Vec<GroupedRecord>>,
    pub total_present: u64,
    pub total_absent: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseAttendanceRow {
    pub student_name: String,
    pub teacher_name: String,
    pub status: String,
}

/// Present-count over conducted-count for one student in one course.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, ToSchema)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RunningAttendance {
    /// No attendance has been conducted for the course yet.
    NoData,
    Percentage { value: f64 },
}

impl RunningAttendance {
    pub fn percentage(&self) -> Option<f64> {
        match self {
            RunningAttendance::NoData => None,
            RunningAttendance::Percentage { value } => Some(*value),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunningAttendanceResponse {
    pub student_id: UserId,
    pub student_name: String,
    pub course_id: CourseId,
    pub course_name: String,
    pub attendance: RunningAttendance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_attendance_wire_format() {
        let no_data = serde_json::to_value(RunningAttendance::NoData).unwrap();
        assert_eq!(no_data, serde_json::json!({ "outcome": "noData" }));

        let pct = serde_json::to_value(RunningAttendance::Percentage { value: 50.0 }).unwrap();
        assert_eq!(pct["outcome"], "percentage");
        assert_eq!(pct["value"], 50.0);
    }

    #[test]
    fn test_percentage_accessor() {
        assert_eq!(RunningAttendance::NoData.percentage(), None);
        assert_eq!(
            RunningAttendance::Percentage { value: 100.0 }.percentage(),
            Some(100.0)
        );
    }

    #[test]
    fn test_date_group_field_names() {
        let group = DateGroup {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            courses: BTreeMap::new(),
            total_present: 1,
            total_absent: 0,
        };
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["totalPresent"], 1);
        assert_eq!(json["totalAbsent"], 0);
    }
}

//! Course domain models and DTOs.

use crate::ids::{CourseId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A course. `name` is unique across all courses and the teacher is optional.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub teacher_id: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    /// Whether `teacher_id` is the teacher assigned to this course.
    pub fn is_taught_by(&self, teacher_id: UserId) -> bool {
        self.teacher_id == Some(teacher_id)
    }
}

/// Fields required to insert a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub teacher_id: Option<UserId>,
}

/// DTO for creating a course. The teacher is referenced by username.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub teacher_name: Option<String>,
}

/// DTO for updating a course.
///
/// An absent or blank `teacher_name` unassigns the current teacher.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub teacher_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeacherDto {
    pub teacher_id: UserId,
}

/// Course listing entry with the teacher's name resolved.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithTeacher {
    pub id: CourseId,
    pub name: String,
    pub teacher_id: Option<UserId>,
    pub teacher_name: String,
}

/// Minimal course reference returned to teachers.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: CourseId,
    pub course_name: String,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        CourseSummary {
            course_id: course.id,
            course_name: course.name.clone(),
        }
    }
}

/// Treats `None` and whitespace-only strings the same way.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_dto_validation() {
        let valid = CreateCourseDto {
            name: "Algebra".to_string(),
            teacher_name: None,
        };
        assert!(valid.validate().is_ok());

        let empty = CreateCourseDto {
            name: "".to_string(),
            teacher_name: Some("t1".to_string()),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_update_course_dto_allows_missing_fields() {
        let dto = UpdateCourseDto {
            name: None,
            teacher_name: None,
        };
        assert!(dto.validate().is_ok());

        let blank_name = UpdateCourseDto {
            name: Some("".to_string()),
            teacher_name: None,
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_create_course_dto_reads_camel_case() {
        let dto: CreateCourseDto =
            serde_json::from_str(r#"{"name":"Physics","teacherName":"mr_x"}"#).unwrap();
        assert_eq!(dto.teacher_name.as_deref(), Some("mr_x"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" t1 ")), Some("t1"));
    }

    #[test]
    fn test_is_taught_by() {
        let teacher = UserId::new();
        let course = Course {
            id: CourseId::new(),
            name: "History".to_string(),
            teacher_id: Some(teacher),
            created_at: chrono::Utc::now(),
        };
        assert!(course.is_taught_by(teacher));
        assert!(!course.is_taught_by(UserId::new()));

        let unassigned = Course {
            teacher_id: None,
            ..course
        };
        assert!(!unassigned.is_taught_by(teacher));
    }
}

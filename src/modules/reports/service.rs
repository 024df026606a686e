use std::collections::{BTreeMap, HashSet};

use anyhow::anyhow;
use chrono::NaiveDate;
use rollcall_core::AppError;
use rollcall_db::{Store, UnitOfWork};
use rollcall_models::{
    AttendanceEntry, Course, CourseAttendanceRow, CourseId, CourseSummary, DateGroup,
    RunningAttendanceResponse, StudentSummary, UserId,
};
use tracing::instrument;

use crate::modules::enrollments::EnrollmentService;
use crate::modules::reports::aggregation::{self, Directory};
use crate::modules::users::UserService;

/// Read-only views composed from enrollments, attendance and the
/// aggregation functions. Unknown ids always surface as `NotFound`; an
/// empty result means the id is valid and nothing qualifies.
pub struct ReportService;

impl ReportService {
    #[instrument(skip(store))]
    pub async fn teacher_courses(
        store: &dyn Store,
        teacher_id: UserId,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let mut uow = store.begin().await?;
        UserService::require_teacher(uow.as_mut(), teacher_id).await?;

        let courses = uow.list_courses_by_teacher(teacher_id).await?;
        Ok(courses.iter().map(CourseSummary::from).collect())
    }

    #[instrument(skip(store))]
    pub async fn course_students(
        store: &dyn Store,
        course_id: CourseId,
    ) -> Result<Vec<StudentSummary>, AppError> {
        let mut uow = store.begin().await?;
        require_course(uow.as_mut(), course_id).await?;
        enrolled_students(uow.as_mut(), course_id).await
    }

    /// Enrolled students of a course that have no attendance row for `today`.
    #[instrument(skip(store))]
    pub async fn unmarked_students(
        store: &dyn Store,
        course_id: CourseId,
        today: NaiveDate,
    ) -> Result<Vec<StudentSummary>, AppError> {
        let mut uow = store.begin().await?;
        require_course(uow.as_mut(), course_id).await?;

        let marked: HashSet<UserId> = uow
            .list_attendance_by_course_on(course_id, today)
            .await?
            .into_iter()
            .map(|a| a.student_id)
            .collect();

        let students = enrolled_students(uow.as_mut(), course_id).await?;
        Ok(students
            .into_iter()
            .filter(|s| !marked.contains(&s.student_id))
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn student_courses(
        store: &dyn Store,
        student_id: UserId,
    ) -> Result<Vec<CourseSummary>, AppError> {
        let mut uow = store.begin().await?;
        EnrollmentService::require_student(uow.as_mut(), student_id).await?;

        let mut courses = Vec::new();
        for enrollment in uow.list_enrollments_by_student(student_id).await? {
            if let Some(course) = uow.get_course(enrollment.course_id).await? {
                courses.push(CourseSummary::from(&course));
            }
        }

        Ok(courses)
    }

    /// Every attendance record of a student, most recent first.
    #[instrument(skip(store))]
    pub async fn student_history(
        store: &dyn Store,
        student_id: UserId,
    ) -> Result<Vec<AttendanceEntry>, AppError> {
        let mut uow = store.begin().await?;
        EnrollmentService::require_student(uow.as_mut(), student_id).await?;

        let records = uow.list_attendance_by_student(student_id).await?;
        let directory = load_directory(uow.as_mut()).await?;

        Ok(directory.resolve(&records))
    }

    pub async fn student_history_by_date(
        store: &dyn Store,
        student_id: UserId,
    ) -> Result<Vec<DateGroup>, AppError> {
        let history = Self::student_history(store, student_id).await?;
        Ok(aggregation::group_by_date(&history))
    }

    #[instrument(skip(store))]
    pub async fn running_attendance(
        store: &dyn Store,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<RunningAttendanceResponse, AppError> {
        let mut uow = store.begin().await?;
        let student = EnrollmentService::require_student(uow.as_mut(), student_id).await?;
        let course = require_course(uow.as_mut(), course_id).await?;

        let records = uow.list_attendance_by_student(student_id).await?;
        let directory = load_directory(uow.as_mut()).await?;
        let history = directory.resolve(&records);

        Ok(RunningAttendanceResponse {
            student_id: student.id,
            student_name: student.username,
            course_id: course.id,
            course_name: course.name,
            attendance: aggregation::running_attendance(&history, student_id, course_id),
        })
    }

    /// Every attendance record across the courses a teacher teaches, with
    /// the teacher's name on each record.
    #[instrument(skip(store))]
    pub async fn teacher_history(
        store: &dyn Store,
        teacher_id: UserId,
    ) -> Result<Vec<AttendanceEntry>, AppError> {
        let mut uow = store.begin().await?;
        UserService::require_teacher(uow.as_mut(), teacher_id).await?;

        let course_ids: Vec<CourseId> = uow
            .list_courses_by_teacher(teacher_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let records = uow.list_attendance_by_courses(&course_ids).await?;
        let directory = load_directory(uow.as_mut()).await?;

        Ok(directory.resolve(&records))
    }

    pub async fn teacher_history_by_date(
        store: &dyn Store,
        teacher_id: UserId,
    ) -> Result<Vec<DateGroup>, AppError> {
        let history = Self::teacher_history(store, teacher_id).await?;
        Ok(aggregation::group_by_date(&history))
    }

    pub async fn teacher_history_by_course(
        store: &dyn Store,
        teacher_id: UserId,
    ) -> Result<BTreeMap<String, Vec<CourseAttendanceRow>>, AppError> {
        let history = Self::teacher_history(store, teacher_id).await?;
        Ok(aggregation::group_by_course(&history))
    }

    /// Every attendance record in the system grouped by date.
    #[instrument(skip(store))]
    pub async fn all_history_by_date(store: &dyn Store) -> Result<Vec<DateGroup>, AppError> {
        let mut uow = store.begin().await?;

        let records = uow.list_attendance().await?;
        let directory = load_directory(uow.as_mut()).await?;

        Ok(aggregation::group_by_date(&directory.resolve(&records)))
    }
}

async fn require_course(uow: &mut dyn UnitOfWork, course_id: CourseId) -> Result<Course, AppError> {
    uow.get_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
}

async fn enrolled_students(
    uow: &mut dyn UnitOfWork,
    course_id: CourseId,
) -> Result<Vec<StudentSummary>, AppError> {
    let mut students = Vec::new();
    for enrollment in uow.list_enrollments_by_course(course_id).await? {
        if let Some(student) = uow.get_user(enrollment.student_id).await? {
            students.push(StudentSummary {
                student_id: student.id,
                student_name: student.username,
            });
        }
    }

    Ok(students)
}

async fn load_directory(uow: &mut dyn UnitOfWork) -> Result<Directory, AppError> {
    let users = uow.list_users().await?;
    let courses = uow.list_courses().await?;
    Ok(Directory::new(users, courses))
}

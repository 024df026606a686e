use anyhow::anyhow;
use rollcall_core::AppError;
use rollcall_db::{Store, UnitOfWork};
use rollcall_models::{
    AssignTeacherDto, Course, CourseId, CourseWithTeacher, CreateCourseDto, NewCourse,
    UpdateCourseDto, UserId, courses::non_blank,
};
use tracing::{info, instrument};

use crate::modules::enrollments::EnrollmentService;
use crate::modules::reports::aggregation::Directory;
use crate::modules::users::UserService;

pub struct CourseService;

impl CourseService {
    /// Creates a course, optionally assigning a teacher by username.
    #[instrument(skip(store, dto), fields(name = %dto.name))]
    pub async fn create_course(store: &dyn Store, dto: CreateCourseDto) -> Result<Course, AppError> {
        let name = required_name(&dto.name)?;

        let mut uow = store.begin().await?;

        if uow.get_course_by_name(&name).await?.is_some() {
            return Err(name_taken());
        }

        let teacher_id = resolve_teacher(uow.as_mut(), dto.teacher_name.as_deref()).await?;

        let course = uow
            .create_course(NewCourse { name, teacher_id })
            .await
            .map_err(map_unique_name)?;

        uow.commit().await?;
        info!(course_id = %course.id, "Course created");

        Ok(course)
    }

    /// Lists every course with its teacher's name resolved.
    #[instrument(skip(store))]
    pub async fn list_courses(store: &dyn Store) -> Result<Vec<CourseWithTeacher>, AppError> {
        let mut uow = store.begin().await?;

        let courses = uow.list_courses().await?;
        let directory = Directory::new(uow.list_users().await?, courses.clone());

        Ok(courses
            .into_iter()
            .map(|c| CourseWithTeacher {
                teacher_name: directory.teacher_name(c.teacher_id),
                id: c.id,
                name: c.name,
                teacher_id: c.teacher_id,
            })
            .collect())
    }

    /// Renames a course and replaces its teacher.
    ///
    /// An absent or blank `teacher_name` leaves the course without a teacher.
    #[instrument(skip(store, dto))]
    pub async fn update_course(
        store: &dyn Store,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let mut uow = store.begin().await?;

        let mut course = uow
            .get_course(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if let Some(raw) = dto.name.as_deref() {
            let name = required_name(raw)?;
            if let Some(existing) = uow.get_course_by_name(&name).await?
                && existing.id != id
            {
                return Err(name_taken());
            }
            course.name = name;
        }

        course.teacher_id = resolve_teacher(uow.as_mut(), dto.teacher_name.as_deref()).await?;

        uow.update_course(&course).await.map_err(map_unique_name)?;
        uow.commit().await?;
        info!(course_id = %course.id, "Course updated");

        Ok(course)
    }

    #[instrument(skip(store))]
    pub async fn assign_teacher(
        store: &dyn Store,
        id: CourseId,
        dto: AssignTeacherDto,
    ) -> Result<Course, AppError> {
        let mut uow = store.begin().await?;

        let mut course = uow
            .get_course(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;
        let teacher = UserService::require_teacher(uow.as_mut(), dto.teacher_id).await?;

        course.teacher_id = Some(teacher.id);
        uow.update_course(&course).await?;
        uow.commit().await?;
        info!(course_id = %course.id, teacher_id = %teacher.id, "Teacher assigned");

        Ok(course)
    }

    /// Deletes a course, its enrollments and its attendance in one unit of
    /// work.
    #[instrument(skip(store))]
    pub async fn delete_course(store: &dyn Store, id: CourseId) -> Result<(), AppError> {
        let mut uow = store.begin().await?;

        if uow.get_course(id).await?.is_none() {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }

        EnrollmentService::cascade_delete_for_course(uow.as_mut(), id).await?;
        let attendance = uow.delete_attendance_by_course(id).await?;
        uow.delete_course(id).await?;
        uow.commit().await?;
        info!(attendance_removed = attendance, "Course deleted");

        Ok(())
    }
}

fn required_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::unprocessable(anyhow!("Course name must not be blank")));
    }
    Ok(name.to_string())
}

async fn resolve_teacher(
    uow: &mut dyn UnitOfWork,
    teacher_name: Option<&str>,
) -> Result<Option<UserId>, AppError> {
    match non_blank(teacher_name) {
        Some(username) => {
            let teacher = UserService::require_teacher_by_name(uow, username).await?;
            Ok(Some(teacher.id))
        }
        None => Ok(None),
    }
}

fn name_taken() -> AppError {
    AppError::conflict(anyhow!("Course name already exists"))
}

fn map_unique_name(err: rollcall_db::StoreError) -> AppError {
    if err.is_unique_violation() {
        name_taken()
    } else {
        AppError::from(err)
    }
}

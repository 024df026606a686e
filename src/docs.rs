use utoipa::OpenApi;

use rollcall_core::{ErrorKind, ErrorResponse};
use rollcall_models::{
    AssignTeacherDto, Attendance, AttendanceEntry, AttendanceStatus, Course, CourseAttendanceRow,
    CourseSummary, CourseWithTeacher, CreateCourseDto, CreateUserDto, DateGroup, EnrollDto,
    EnrollmentSummary, GroupedRecord, MarkAttendanceEntry, MarkAttendanceResponse, Role,
    RunningAttendance, RunningAttendanceResponse, StudentSummary, UpdateCourseDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::get_teacher,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::assign_teacher,
        crate::modules::courses::controller::delete_course,
        crate::modules::enrollments::controller::enroll_student,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::reports::controller::get_teacher_courses,
        crate::modules::reports::controller::get_teacher_attendance,
        crate::modules::reports::controller::get_teacher_attendance_by_date,
        crate::modules::reports::controller::get_teacher_attendance_by_course,
        crate::modules::reports::controller::get_course_students,
        crate::modules::reports::controller::get_unmarked_students,
        crate::modules::reports::controller::get_student_courses,
        crate::modules::reports::controller::get_student_attendance,
        crate::modules::reports::controller::get_student_attendance_by_date,
        crate::modules::reports::controller::get_running_attendance,
        crate::modules::reports::controller::get_all_attendance_by_date,
    ),
    components(
        schemas(
            User,
            Role,
            CreateUserDto,
            Course,
            CourseWithTeacher,
            CourseSummary,
            CreateCourseDto,
            UpdateCourseDto,
            AssignTeacherDto,
            EnrollDto,
            EnrollmentSummary,
            StudentSummary,
            Attendance,
            AttendanceStatus,
            MarkAttendanceEntry,
            MarkAttendanceResponse,
            AttendanceEntry,
            GroupedRecord,
            DateGroup,
            CourseAttendanceRow,
            RunningAttendance,
            RunningAttendanceResponse,
            ErrorResponse,
            ErrorKind,
        )
    ),
    tags(
        (name = "Users", description = "User administration"),
        (name = "Courses", description = "Course administration and rosters"),
        (name = "Enrollments", description = "Student enrollment"),
        (name = "Attendance", description = "Roll-call marking and overview"),
        (name = "Teachers", description = "Teacher views"),
        (name = "Students", description = "Student views")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "Class enrollment and daily attendance with aggregated reports.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

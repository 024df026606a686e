//! # Rollcall Models
//!
//! Domain models and DTOs for the Rollcall API.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity ids
//! - [`users`]: Users and their roles
//! - [`courses`]: Courses and course administration DTOs
//! - [`enrollments`]: Student/course membership
//! - [`attendance`]: Attendance records and the roll-call batch entry
//! - [`reports`]: Grouped and aggregated attendance views
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::{Role, User, UserId};
//!
//! fn can_enroll(user: &User) -> bool {
//!     user.role == Role::Student
//! }
//! ```

pub mod attendance;
pub mod courses;
pub mod enrollments;
pub mod ids;
pub mod reports;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use ids::{AttendanceId, CourseId, EnrollmentId, UserId};

pub use users::{CreateUserDto, NewUser, Role, User};

pub use courses::{
    AssignTeacherDto, Course, CourseSummary, CourseWithTeacher, CreateCourseDto, NewCourse,
    UpdateCourseDto,
};

pub use enrollments::{EnrollDto, Enrollment, EnrollmentSummary, StudentSummary};

pub use attendance::{
    Attendance, AttendanceStatus, MarkAttendanceEntry, MarkAttendanceResponse, NewAttendance,
};

pub use reports::{
    AttendanceEntry, CourseAttendanceRow, DateGroup, GroupedRecord, RunningAttendance,
    RunningAttendanceResponse,
};

pub mod attendance;
pub mod courses;
pub mod enrollments;
pub mod reports;
pub mod users;

//! Seeding configuration and generated seed rows.

use rollcall_models::Role;

/// A generated user waiting to be inserted.
#[derive(Debug, Clone)]
pub struct UserSeed {
    pub username: String,
    pub role: Role,
}

/// A generated course. `teacher` indexes into the seeded teachers.
#[derive(Debug, Clone)]
pub struct CourseSeed {
    pub name: String,
    pub teacher: Option<usize>,
}

/// How much data [`seed_all`](super::seed_all) generates.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub courses: usize,
    pub enrollments_per_student: usize,
    /// Days of attendance to record, ending today.
    pub days: usize,
    /// Percentage of marks recorded as present.
    pub present_ratio: u8,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 4,
            students: 40,
            courses: 6,
            enrollments_per_student: 3,
            days: 10,
            present_ratio: 85,
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize, students: usize) -> Self {
        Self {
            teachers,
            students,
            ..Default::default()
        }
    }

    pub fn with_courses(mut self, courses: usize) -> Self {
        self.courses = courses;
        self
    }

    pub fn with_enrollments(mut self, per_student: usize) -> Self {
        self.enrollments_per_student = per_student;
        self
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Enrollments actually created per student. A student cannot take more
    /// courses than exist.
    pub fn effective_enrollments(&self) -> usize {
        self.enrollments_per_student.min(self.courses)
    }

    pub fn total_enrollments(&self) -> usize {
        self.students * self.effective_enrollments()
    }
}

/// Row counts written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub attendance: usize,
}

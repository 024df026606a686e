//! User and course generation.
//!
//! Generation is pure and parallel; inserting happens in
//! [`seed_all`](super::seed_all).

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use rollcall_models::Role;

use super::models::{CourseSeed, UserSeed};

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Biology",
    "Chemistry",
    "Physics",
    "History",
    "Geography",
    "Literature",
    "Art",
    "Music",
    "Economics",
];

pub fn generate_users(role: Role, count: usize) -> Vec<UserSeed> {
    let prefix = match role {
        Role::Student => "s",
        Role::Teacher => "t",
        Role::Admin => "a",
    };

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            UserSeed {
                username: format!(
                    "{}.{}.{}{}",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    prefix,
                    idx
                ),
                role,
            }
        })
        .collect()
}

/// Courses are handed to teachers round-robin. Without teachers every course
/// is left unassigned. Numbering starts after `existing` so repeated runs
/// produce new names.
pub fn generate_courses(count: usize, teachers: usize, existing: usize) -> Vec<CourseSeed> {
    (0..count)
        .map(|idx| {
            let number = existing + idx;
            CourseSeed {
                name: format!("{} {}", SUBJECTS[number % SUBJECTS.len()], 101 + number),
                teacher: (teachers > 0).then(|| idx % teachers),
            }
        })
        .collect()
}

/// Course indexes for each student. Student `i` takes `per_student`
/// consecutive courses starting at `i`, wrapping around, so no pair repeats.
pub fn plan_enrollments(students: usize, courses: usize, per_student: usize) -> Vec<Vec<usize>> {
    let per_student = per_student.min(courses);
    (0..students)
        .map(|student| {
            (0..per_student)
                .map(|offset| (student + offset) % courses)
                .collect()
        })
        .collect()
}

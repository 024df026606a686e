//! Database seeding.
//!
//! Generates teachers, students, courses, enrollments and a window of past
//! attendance, then writes all of it in a single unit of work. A failed run
//! leaves nothing behind.

pub mod models;
pub mod users;

use std::time::Instant;

use anyhow::{Context, bail};
use chrono::{Duration, NaiveDate};
use fake::Fake;
use fake::faker::boolean::en::Boolean;
use rollcall_db::Store;
use rollcall_models::{AttendanceStatus, NewAttendance, NewCourse, NewUser, Role, UserId};

pub use models::{CourseSeed, SeedConfig, SeedSummary, UserSeed};

pub async fn seed_all(
    store: &dyn Store,
    config: &SeedConfig,
    today: NaiveDate,
) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} teachers, {} students and {} courses...",
        config.teachers, config.students, config.courses
    );

    let teacher_seeds = users::generate_users(Role::Teacher, config.teachers);
    let student_seeds = users::generate_users(Role::Student, config.students);
    let plan = users::plan_enrollments(
        config.students,
        config.courses,
        config.enrollments_per_student,
    );

    let mut summary = SeedSummary::default();
    let mut uow = store.begin().await?;

    let existing_courses = uow.list_courses().await?.len();
    let course_seeds =
        users::generate_courses(config.courses, config.teachers, existing_courses);
    for seed in &course_seeds {
        if uow.get_course_by_name(&seed.name).await?.is_some() {
            bail!(
                "course '{}' already exists, remove it or seed a fresh database",
                seed.name
            );
        }
    }

    let mut teacher_ids: Vec<UserId> = Vec::with_capacity(teacher_seeds.len());
    let mut student_ids: Vec<UserId> = Vec::with_capacity(student_seeds.len());
    for seed in teacher_seeds.into_iter().chain(student_seeds) {
        let role = seed.role;
        let user = uow
            .create_user(NewUser {
                username: seed.username,
                role,
            })
            .await
            .context("failed to insert seeded user")?;
        match role {
            Role::Teacher => teacher_ids.push(user.id),
            _ => student_ids.push(user.id),
        }
        summary.users += 1;
    }
    println!("   ✓ Inserted {} users", summary.users);

    let mut course_ids = Vec::with_capacity(course_seeds.len());
    for seed in course_seeds {
        let course = uow
            .create_course(NewCourse {
                name: seed.name,
                teacher_id: seed.teacher.map(|idx| teacher_ids[idx]),
            })
            .await
            .context("failed to insert seeded course")?;
        course_ids.push(course.id);
        summary.courses += 1;
    }
    println!("   ✓ Inserted {} courses", summary.courses);

    for (student, courses) in plan.iter().enumerate() {
        for &course in courses {
            uow.create_enrollment(student_ids[student], course_ids[course])
                .await
                .context("failed to insert seeded enrollment")?;
            summary.enrollments += 1;
        }
    }
    println!("   ✓ Inserted {} enrollments", summary.enrollments);

    for offset in 0..config.days {
        let date = today - Duration::days(offset as i64);
        for (student, courses) in plan.iter().enumerate() {
            for &course in courses {
                let present: bool = Boolean(config.present_ratio).fake();
                let status = if present {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                };

                uow.create_attendance(NewAttendance {
                    course_id: course_ids[course],
                    student_id: student_ids[student],
                    date,
                    status: status.as_str().to_string(),
                })
                .await
                .context("failed to insert seeded attendance")?;
                summary.attendance += 1;
            }
        }
    }
    println!("   ✓ Inserted {} attendance records", summary.attendance);

    uow.commit().await?;
    println!("✅ Seeding finished in {:?}", start_time.elapsed());

    Ok(summary)
}

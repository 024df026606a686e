//! Pure transformations from attendance records to report views.
//!
//! Nothing here touches the store. The façade loads records and a
//! [`Directory`] of names, resolves the records into [`AttendanceEntry`]
//! values and hands them to the grouping functions below.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rollcall_models::{
    Attendance, AttendanceEntry, AttendanceStatus, Course, CourseAttendanceRow, CourseId,
    DateGroup, GroupedRecord, RunningAttendance, User, UserId,
    reports::{NO_TEACHER, UNKNOWN_STUDENT, UNKNOWN_TEACHER},
};

/// Snapshot of user and course names used to denormalize records.
#[derive(Debug, Default)]
pub struct Directory {
    users: HashMap<UserId, String>,
    courses: HashMap<CourseId, Course>,
}

impl Directory {
    pub fn new(
        users: impl IntoIterator<Item = User>,
        courses: impl IntoIterator<Item = Course>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u.username)).collect(),
            courses: courses.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn student_name(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_STUDENT.to_string())
    }

    /// "None" for an unassigned course, "Unknown" for a dangling teacher id.
    pub fn teacher_name(&self, teacher_id: Option<UserId>) -> String {
        match teacher_id {
            None => NO_TEACHER.to_string(),
            Some(id) => self
                .users
                .get(&id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_TEACHER.to_string()),
        }
    }

    /// Resolves names onto raw records, keeping their order. Records whose
    /// course is not in the directory are dropped.
    pub fn resolve(&self, records: &[Attendance]) -> Vec<AttendanceEntry> {
        records
            .iter()
            .filter_map(|record| {
                let course = self.courses.get(&record.course_id)?;
                Some(AttendanceEntry {
                    course_id: course.id,
                    course_name: course.name.clone(),
                    student_id: record.student_id,
                    student_name: self.student_name(record.student_id),
                    teacher_name: self.teacher_name(course.teacher_id),
                    date: record.date,
                    status: record.status.clone(),
                })
            })
            .collect()
    }
}

/// Partitions entries by date, most recent first, then by course name.
///
/// Per-date totals span every course of the date and only count statuses
/// recognized as present or absent. Order inside a course group follows the
/// input and is otherwise unspecified.
pub fn group_by_date(entries: &[AttendanceEntry]) -> Vec<DateGroup> {
    let mut by_date: BTreeMap<NaiveDate, DateGroup> = BTreeMap::new();

    for entry in entries {
        let group = by_date.entry(entry.date).or_insert_with(|| DateGroup {
            date: entry.date,
            courses: BTreeMap::new(),
            total_present: 0,
            total_absent: 0,
        });

        match AttendanceStatus::classify(&entry.status) {
            Some(AttendanceStatus::Present) => group.total_present += 1,
            Some(AttendanceStatus::Absent) => group.total_absent += 1,
            None => {}
        }

        group
            .courses
            .entry(entry.course_name.clone())
            .or_default()
            .push(GroupedRecord {
                student_id: entry.student_id,
                student_name: entry.student_name.clone(),
                teacher_name: entry.teacher_name.clone(),
                status: entry.status.clone(),
            });
    }

    by_date.into_values().rev().collect()
}

/// Partitions entries by course name.
pub fn group_by_course(entries: &[AttendanceEntry]) -> BTreeMap<String, Vec<CourseAttendanceRow>> {
    let mut by_course: BTreeMap<String, Vec<CourseAttendanceRow>> = BTreeMap::new();

    for entry in entries {
        by_course
            .entry(entry.course_name.clone())
            .or_default()
            .push(CourseAttendanceRow {
                student_name: entry.student_name.clone(),
                teacher_name: entry.teacher_name.clone(),
                status: entry.status.clone(),
            });
    }

    by_course
}

/// Present share, in percent, of the sessions recorded for one student in
/// one course.
pub fn running_attendance(
    entries: &[AttendanceEntry],
    student_id: UserId,
    course_id: CourseId,
) -> RunningAttendance {
    let (present, conducted) = entries
        .iter()
        .filter(|e| e.student_id == student_id && e.course_id == course_id)
        .fold((0u64, 0u64), |(present, conducted), e| {
            let is_present =
                AttendanceStatus::classify(&e.status) == Some(AttendanceStatus::Present);
            (present + u64::from(is_present), conducted + 1)
        });

    if conducted == 0 {
        return RunningAttendance::NoData;
    }

    RunningAttendance::Percentage {
        value: present as f64 / conducted as f64 * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rollcall_models::{AttendanceId, Role};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        course: (CourseId, &str),
        student: (UserId, &str),
        date: NaiveDate,
        status: &str,
    ) -> AttendanceEntry {
        AttendanceEntry {
            course_id: course.0,
            course_name: course.1.to_string(),
            student_id: student.0,
            student_name: student.1.to_string(),
            teacher_name: "T".to_string(),
            date,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_single_mark_groups_under_its_date_and_course() {
        let c = (CourseId::new(), "C");
        let s = (UserId::new(), "S");
        let entries = vec![entry(c, s, date(2024, 1, 1), "Present")];

        let groups = group_by_date(&entries);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.date, date(2024, 1, 1));
        assert_eq!(group.total_present, 1);
        assert_eq!(group.total_absent, 0);
        assert_eq!(group.courses.len(), 1);
        let records = &group.courses["C"];
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_name, "S");
        assert_eq!(records[0].status, "Present");
    }

    #[test]
    fn test_dates_are_strictly_descending() {
        let c = (CourseId::new(), "C");
        let s = (UserId::new(), "S");
        let entries = vec![
            entry(c, s, date(2024, 1, 2), "Present"),
            entry(c, s, date(2024, 1, 5), "Absent"),
            entry(c, s, date(2023, 12, 31), "Present"),
            entry(c, s, date(2024, 1, 2), "Absent"),
        ];

        let dates: Vec<NaiveDate> = group_by_date(&entries).iter().map(|g| g.date).collect();

        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 2), date(2023, 12, 31)]
        );
    }

    #[test]
    fn test_totals_span_courses_and_ignore_case() {
        let math = (CourseId::new(), "Math");
        let art = (CourseId::new(), "Art");
        let day = date(2024, 2, 1);
        let entries = vec![
            entry(math, (UserId::new(), "A"), day, "present"),
            entry(math, (UserId::new(), "B"), day, "ABSENT"),
            entry(art, (UserId::new(), "C"), day, "Present"),
            entry(art, (UserId::new(), "D"), day, "Late"),
        ];

        let groups = group_by_date(&entries);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_present, 2);
        assert_eq!(groups[0].total_absent, 1);
        assert_eq!(groups[0].courses["Math"].len(), 2);
        assert_eq!(groups[0].courses["Art"].len(), 2);
    }

    #[test]
    fn test_totals_equal_recognized_records_per_date() {
        let c = (CourseId::new(), "C");
        let entries: Vec<AttendanceEntry> = (0..10)
            .map(|i| {
                let status = if i % 3 == 0 { "Absent" } else { "Present" };
                entry(c, (UserId::new(), "S"), date(2024, 3, 1 + i % 4), status)
            })
            .collect();

        for group in group_by_date(&entries) {
            let recognized = entries
                .iter()
                .filter(|e| e.date == group.date)
                .filter(|e| AttendanceStatus::classify(&e.status).is_some())
                .count() as u64;
            assert_eq!(group.total_present + group.total_absent, recognized);
        }
    }

    #[test]
    fn test_two_students_same_day() {
        let c = (CourseId::new(), "C");
        let s1 = (UserId::new(), "S1");
        let s2 = (UserId::new(), "S2");
        let day = date(2024, 1, 1);
        let entries = vec![entry(c, s1, day, "Present"), entry(c, s2, day, "Absent")];

        let groups = group_by_date(&entries);
        assert_eq!(groups[0].total_present, 1);
        assert_eq!(groups[0].total_absent, 1);

        assert_eq!(
            running_attendance(&entries, s1.0, c.0),
            RunningAttendance::Percentage { value: 100.0 }
        );
        assert_eq!(
            running_attendance(&entries, s2.0, c.0),
            RunningAttendance::Percentage { value: 0.0 }
        );
    }

    #[test]
    fn test_running_attendance_without_records_is_no_data() {
        let c = (CourseId::new(), "C");
        let s = (UserId::new(), "S");
        assert_eq!(running_attendance(&[], s.0, c.0), RunningAttendance::NoData);

        let other_course = vec![entry((CourseId::new(), "Other"), s, date(2024, 1, 1), "Present")];
        assert_eq!(
            running_attendance(&other_course, s.0, c.0),
            RunningAttendance::NoData
        );
    }

    #[test]
    fn test_running_attendance_ratio() {
        let c = (CourseId::new(), "C");
        let s = (UserId::new(), "S");
        let entries = vec![
            entry(c, s, date(2024, 1, 1), "Present"),
            entry(c, s, date(2024, 1, 2), "absent"),
            entry(c, s, date(2024, 1, 3), "PRESENT"),
            entry(c, s, date(2024, 1, 4), "Absent"),
        ];

        assert_eq!(
            running_attendance(&entries, s.0, c.0).percentage(),
            Some(50.0)
        );
    }

    #[test]
    fn test_group_by_course() {
        let math = (CourseId::new(), "Math");
        let art = (CourseId::new(), "Art");
        let s = (UserId::new(), "S");
        let entries = vec![
            entry(math, s, date(2024, 1, 1), "Present"),
            entry(art, s, date(2024, 1, 1), "Absent"),
            entry(math, s, date(2024, 1, 2), "Absent"),
        ];

        let grouped = group_by_course(&entries);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["Art", "Math"]);
        assert_eq!(grouped["Math"].len(), 2);
        assert_eq!(grouped["Art"][0].status, "Absent");
    }

    #[test]
    fn test_grouping_does_not_mutate_input() {
        let c = (CourseId::new(), "C");
        let s = (UserId::new(), "S");
        let entries = vec![
            entry(c, s, date(2024, 1, 2), "Present"),
            entry(c, s, date(2024, 1, 1), "Absent"),
        ];
        let before = entries.clone();

        let first = group_by_date(&entries);
        let second = group_by_date(&entries);

        assert_eq!(entries, before);
        assert_eq!(first, second);
    }

    fn user(username: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            username: username.to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn course(name: &str, teacher_id: Option<UserId>) -> Course {
        Course {
            id: CourseId::new(),
            name: name.to_string(),
            teacher_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_teacher_name_resolution() {
        let teacher = user("mr_t", Role::Teacher);
        let directory = Directory::new(vec![teacher.clone()], Vec::new());

        assert_eq!(directory.teacher_name(None), "None");
        assert_eq!(directory.teacher_name(Some(teacher.id)), "mr_t");
        assert_eq!(directory.teacher_name(Some(UserId::new())), "Unknown");
    }

    #[test]
    fn test_resolve_fills_names_and_keeps_deleted_students() {
        let teacher = user("mr_t", Role::Teacher);
        let student = user("sam", Role::Student);
        let math = course("Math", Some(teacher.id));
        let gone = UserId::new();
        let math_id = math.id;

        let record = |student_id| Attendance {
            id: AttendanceId::new(),
            course_id: math_id,
            student_id,
            date: date(2024, 1, 1),
            status: "Present".to_string(),
            created_at: Utc::now(),
        };
        let orphan_course = Attendance {
            course_id: CourseId::new(),
            ..record(student.id)
        };

        let directory = Directory::new(vec![teacher, student.clone()], vec![math]);
        let entries = directory.resolve(&[record(student.id), record(gone), orphan_course]);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].student_name, "sam");
        assert_eq!(entries[0].course_name, "Math");
        assert_eq!(entries[0].teacher_name, "mr_t");
        assert_eq!(entries[1].student_name, "Unknown");
    }
}

pub mod aggregation;
pub mod controller;
pub mod router;
pub mod service;

pub use router::{
    init_admin_attendance_router, init_course_roster_router, init_students_router,
    init_teachers_router,
};
pub use service::ReportService;

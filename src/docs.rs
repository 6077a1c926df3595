use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, MarkSource},
    student::Student,
};
use crate::models::{
    AttendanceCreate, AttendanceUpdate, LoginReqDto, LoginResponse, MarkAttendanceResponse,
    MessageResponse, StudentStatus, StudentWithAttendance,
};
use crate::tracker::aggregate::AttendanceTally;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "School Attendance API",
        version = "1.0.0",
        description = r#"
## School Attendance Tracker

Teachers log in, mark daily attendance and review per-student statistics.
An external face-recognition client pushes today's attendance through a
dedicated endpoint.

### Attendance rules
- One record per student per calendar date; a later write replaces the earlier one.
- `monthly_percentage` and `monthly_stats` cover the 30 days up to and including the reference date.
- `overall_percentage` covers the whole history.
- Percentages are rounded to one decimal and are `0` when there are no records.

### Response Format
- JSON bodies; errors are `{"detail": "..."}`
- Dates are ISO-8601 calendar dates (`YYYY-MM-DD`)
- Status values are `present` or `absent`
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::students::list_students,
        crate::api::students::student_attendance,

        crate::api::attendance::attendance_by_date,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::student_status,

        crate::api::external::mark_attendance
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Student,
            AttendanceRecord,
            AttendanceStatus,
            MarkSource,
            AttendanceCreate,
            AttendanceUpdate,
            MarkAttendanceResponse,
            MessageResponse,
            StudentWithAttendance,
            StudentStatus,
            AttendanceTally
        )
    ),
    tags(
        (name = "Auth", description = "Teacher login"),
        (name = "Students", description = "Student roster and raw records"),
        (name = "Attendance", description = "Daily marking and aggregated statistics"),
        (name = "External", description = "Face-recognition integration"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/login",
            "/api/students",
            "/api/students/{student_id}/attendance",
            "/api/attendance/{date}",
            "/api/attendance",
            "/api/student-status/{student_id}",
            "/api/external/mark-attendance",
        ] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
    }
}

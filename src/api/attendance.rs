use crate::{
    error::AppError,
    models::{
        AttendanceUpdate, MarkAttendanceResponse, StudentStatus, StudentStatusQuery,
        StudentWithAttendance,
    },
    store::AttendanceStore,
    tracker::{self, writer},
    utils::date_utils::{normalize_date, today},
};
use actix_web::{HttpResponse, web};
use tracing::instrument;

/// Daily class view
#[utoipa::path(
    get,
    path = "/api/attendance/{date}",
    params(
        ("date" = String, Path, description = "Calendar date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Presence on the date plus trailing 30-day and lifetime percentages", body = [StudentWithAttendance]),
        (status = 400, description = "Malformed date"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_by_date(
    path: web::Path<String>,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let reference = normalize_date(&path.into_inner())?;

    let rows: Vec<StudentWithAttendance> = tracker::class_overview(store.get_ref(), reference)
        .await?
        .into_iter()
        .map(|(student, summary)| StudentWithAttendance::new(student, &summary))
        .collect();

    Ok(HttpResponse::Ok().json(rows))
}

/// Mark attendance for a batch of students
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceUpdate,
    responses(
        (status = 200, description = "Every record written", body = MarkAttendanceResponse, example = json!({
            "success": true,
            "message": "Updated attendance for 2 students",
            "count": 2
        })),
        (status = 400, description = "Malformed date or status, nothing written"),
        (status = 404, description = "Unknown student, nothing written"),
        (status = 500, description = "Failed to mark attendance", body = Object, example = json!({
            "detail": "Failed to mark attendance"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(
    name = "mark_attendance",
    skip(store, payload),
    fields(records = payload.attendance_records.len())
)]
pub async fn mark_attendance(
    payload: web::Json<AttendanceUpdate>,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let count = writer::record_batch(store.get_ref(), &payload.attendance_records).await?;

    Ok(HttpResponse::Ok().json(MarkAttendanceResponse {
        success: true,
        message: format!("Updated attendance for {count} students"),
        count,
    }))
}

/// Aggregated status for one student
#[utoipa::path(
    get,
    path = "/api/student-status/{student_id}",
    params(
        ("student_id" = String, Path, description = "Student id, e.g. STU001"),
        StudentStatusQuery
    ),
    responses(
        (status = 200, description = "Lifetime percentage, trailing 30-day tally and absent dates", body = StudentStatus),
        (status = 404, description = "Student not found", body = Object, example = json!({
            "detail": "Student not found",
            "student_id": "STU404"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn student_status(
    path: web::Path<String>,
    query: web::Query<StudentStatusQuery>,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let reference = match query.date.as_deref() {
        Some(raw) => normalize_date(raw)?,
        None => today(),
    };

    let (student, summary) =
        tracker::student_summary(store.get_ref(), &path.into_inner(), reference).await?;

    Ok(HttpResponse::Ok().json(StudentStatus::new(student, summary)))
}

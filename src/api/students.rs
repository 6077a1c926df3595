use crate::{
    error::AppError,
    model::{attendance::AttendanceRecord, student::Student},
    models::StudentAttendanceQuery,
    store::AttendanceStore,
    utils::date_utils::normalize_date,
};
use actix_web::{HttpResponse, web};
use tracing::debug;

/// List all students
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All students ordered by student id", body = [Student]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn list_students(
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let students = store
        .list_students()
        .await
        .map_err(|e| AppError::processing("Failed to load students", e))?;

    debug!(count = students.len(), "Listed students");
    Ok(HttpResponse::Ok().json(students))
}

/// Raw attendance records for one student
#[utoipa::path(
    get,
    path = "/api/students/{student_id}/attendance",
    params(
        ("student_id" = String, Path, description = "Student id, e.g. STU001"),
        StudentAttendanceQuery
    ),
    responses(
        (status = 200, description = "Records ordered by date", body = [AttendanceRecord]),
        (status = 400, description = "Malformed date_filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn student_attendance(
    path: web::Path<String>,
    query: web::Query<StudentAttendanceQuery>,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    let on = query
        .date_filter
        .as_deref()
        .map(normalize_date)
        .transpose()?;

    let records = store
        .attendance_for_student(&student_id, on)
        .await
        .map_err(|e| AppError::processing("Failed to load attendance", e))?;

    Ok(HttpResponse::Ok().json(records))
}

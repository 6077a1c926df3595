use crate::{
    error::AppError,
    model::attendance::AttendanceStatus,
    models::{ExternalMarkQuery, MessageResponse},
    store::AttendanceStore,
    tracker::writer,
    utils::date_utils::today,
};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

/// Face-recognition push for today's attendance
#[utoipa::path(
    post,
    path = "/api/external/mark-attendance",
    operation_id = "external_mark_attendance",
    params(ExternalMarkQuery),
    responses(
        (status = 200, description = "Attendance marked for today", body = MessageResponse, example = json!({
            "success": true,
            "message": "Attendance marked for STU001"
        })),
        (status = 400, description = "Missing student_id or unknown status"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Failed to mark attendance externally", body = Object, example = json!({
            "detail": "Failed to mark attendance externally"
        }))
    ),
    tag = "External"
)]
#[instrument(
    name = "external_mark_attendance",
    skip(store, query),
    fields(student_id = %query.student_id)
)]
pub async fn mark_attendance(
    query: web::Query<ExternalMarkQuery>,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let status = query.status.unwrap_or(AttendanceStatus::Present);

    writer::record_external(store.get_ref(), &query.student_id, status, today()).await?;

    info!(%status, "External attendance recorded");
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: format!("Attendance marked for {}", query.student_id),
    }))
}

use crate::{
    auth::password::verify_password,
    error::AppError,
    models::{LoginReqDto, LoginResponse},
    store::AttendanceStore,
};
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

/// Teacher login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse, example = json!({
            "success": true,
            "teacher_id": "Ramandeep@singh",
            "name": "Ramandeep Singh"
        })),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "detail": "Invalid credentials"
        })),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, user),
    fields(teacher_id = %user.teacher_id)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if user.teacher_id.trim().is_empty() || user.password.is_empty() {
        info!("Invalid credentials: empty teacher id or password");
        return Err(AppError::InvalidCredentials);
    }

    let teacher = store
        .find_teacher(user.teacher_id.trim())
        .await
        .map_err(|e| AppError::processing("Login failed", e))?
        .ok_or_else(|| {
            info!("Invalid credentials: teacher not found");
            AppError::InvalidCredentials
        })?;

    debug!("Verifying password");

    if let Err(e) = verify_password(&user.password, &teacher.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        teacher_id: teacher.teacher_id,
        name: teacher.name,
    }))
}

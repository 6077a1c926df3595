use crate::store::StoreError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Errors surfaced to HTTP callers. The body is always `{"detail": ...}`.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "Invalid credentials")]
    InvalidCredentials,

    #[display(fmt = "Student not found")]
    StudentNotFound(String),

    #[display(fmt = "{}", _0)]
    BadRequest(String),

    /// Generic message for the caller; the cause is logged where it happened.
    #[display(fmt = "{}", _0)]
    Processing(&'static str),
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::StudentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::StudentNotFound(student_id) => json!({
                "detail": self.to_string(),
                "student_id": student_id,
            }),
            _ => json!({ "detail": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl AppError {
    /// Log a store failure and hide it behind `message`.
    pub fn processing(message: &'static str, cause: StoreError) -> Self {
        tracing::error!(error = %cause, "{}", message);
        AppError::Processing(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn maps_variants_to_status_and_detail_body() {
        let cases = [
            (AppError::InvalidCredentials, 401, "Invalid credentials"),
            (AppError::StudentNotFound("STU404".into()), 404, "Student not found"),
            (AppError::BadRequest("Invalid date 'x'".into()), 400, "Invalid date 'x'"),
            (AppError::Processing("Failed to mark attendance"), 500, "Failed to mark attendance"),
        ];

        for (err, status, detail) in cases {
            let resp = err.error_response();
            assert_eq!(resp.status().as_u16(), status);

            let body = to_bytes(resp.into_body()).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(value["detail"], detail);
        }
    }

    #[test]
    fn processing_hides_the_store_cause() {
        let err = AppError::processing("Failed to mark attendance", StoreError::Poisoned);
        assert_eq!(err.to_string(), "Failed to mark attendance");
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use delivery_core::DeliveryError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// Parametros invalidos
    BadRequest(String),

    /// Error interno
    Internal(String),
}

/// Cuerpo JSON de las respuestas de error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub status_code: u16,
    pub reason: String,
}

impl From<DeliveryError> for AppError {
    fn from(error: DeliveryError) -> Self {
        match error {
            DeliveryError::InvalidDimension { reason, .. } => AppError::BadRequest(reason),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, reason) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Invalid Param", msg),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                msg,
            ),
        };

        let body = Json(ErrorResponse {
            code: code.to_string(),
            status_code: status.as_u16(),
            reason,
        });

        (status, body).into_response()
    }
}

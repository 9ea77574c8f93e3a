use crate::utils::error::LabelError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl IntoResponse for LabelError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            LabelError::BadRequest { .. } => {
                (StatusCode::BAD_REQUEST, "BadRequest", self.to_string())
            }
            LabelError::NotFound { .. } => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            LabelError::Upstream { .. } | LabelError::ApiError(_) => {
                (StatusCode::BAD_GATEWAY, "UpstreamError", self.to_string())
            }
            LabelError::Render { .. }
            | LabelError::PdfError(_)
            | LabelError::ImageError(_) => {
                tracing::error!("Render failure: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RenderError",
                    "PDF rendering failed".to_string(),
                )
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

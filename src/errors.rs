use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::supabase::ClientError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Data service error: {0}")]
    Upstream(#[from] ClientError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized    => (StatusCode::UNAUTHORIZED, "Unauthorized".to_owned()),
            AppError::Forbidden(msg)  => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "Data service call failed");
                match err.status() {
                    Some(StatusCode::UNAUTHORIZED) => {
                        (StatusCode::UNAUTHORIZED, "Unauthorized".to_owned())
                    }
                    _ => (StatusCode::BAD_GATEWAY, "Data service unavailable".to_owned()),
                }
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

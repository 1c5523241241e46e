use axum::{http::StatusCode, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("origin denied")]
    OriginDenied,
    #[error("access denied")]
    AccessDenied,
    #[error("resource load failed")]
    LoadFailed,
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::OriginDenied => "OriginDenied",
            AppError::AccessDenied => "AccessDenied",
            AppError::LoadFailed => "LoadFailed",
            AppError::BadRequest(_) => "BadRequest",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::OriginDenied | AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::LoadFailed => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

pub fn into_response(err: AppError) -> (StatusCode, Json<ErrorBody>) {
    let code = err.code();
    let message = err.to_string();
    (err.status(), Json(ErrorBody { code, message }))
}

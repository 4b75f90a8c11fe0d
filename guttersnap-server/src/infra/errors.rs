use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use guttersnap_core::ValidationError;
use guttersnap_model::SubmissionResponse;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

pub const FILE_TOO_LARGE: &str = "File too large. Maximum size is 10MB.";
pub const NOT_AN_IMAGE: &str = "Only image files are allowed!";
pub const PROCESSING_FAILED: &str =
    "Error processing request. Please try again.";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn file_too_large() -> Self {
        Self::bad_request(FILE_TOO_LARGE)
    }

    pub fn not_an_image() -> Self {
        Self::bad_request(NOT_AN_IMAGE)
    }

    pub fn unexpected_field(name: &str) -> Self {
        Self::bad_request(format!("Unexpected field: {name}"))
    }

    pub fn processing_failed() -> Self {
        Self::internal(PROCESSING_FAILED)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(SubmissionResponse::failed(self.message));
        (self.status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::warn!(error = %err, "malformed multipart body");
        Self::new(err.status(), err.body_text())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(format!("{} ({err})", ValidationError::USER_MESSAGE))
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::model::{now, ErrorResponse};

/// A failure rendered as the API's error envelope.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    error: &'static str,
    message: String,
    path: String,
    errors: Option<Vec<String>>,
}

impl ApiFailure {
    pub fn not_found(path: &str, nomor_induk: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Not Found",
            message: format!("Student with student number {nomor_induk} not found"),
            path: path.to_string(),
            errors: None,
        }
    }

    pub fn bad_request(path: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Bad Request",
            message: message.into(),
            path: path.to_string(),
            errors: None,
        }
    }

    pub fn validation(path: &str, errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Validation Failed",
            message: "Invalid student data".to_string(),
            path: path.to_string(),
            errors: Some(errors),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        tracing::warn!(status = self.status.as_u16(), path = %self.path, message = %self.message, "request rejected");
        let body = ErrorResponse {
            timestamp: now(),
            status: self.status.as_u16(),
            error: self.error.to_string(),
            message: self.message,
            path: self.path,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}

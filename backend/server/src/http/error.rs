use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{error::ApiErrorResponse, logger};

#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    code: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.message.clone(),
                code: format!("{}", self.status.as_u16()),
            },
        });
        (self.status, body).into_response()
    }
}

impl From<error_stack::Report<ApiErrorResponse>> for HttpError {
    fn from(report: error_stack::Report<ApiErrorResponse>) -> Self {
        logger::error!(error = ?report);
        match report.current_context() {
            ApiErrorResponse::BadRequest { message, .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: message.clone(),
            },
            ApiErrorResponse::InternalServerError { message, .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: message.clone(),
            },
        }
    }
}

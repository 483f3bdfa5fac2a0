use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<np_core::Error> for ApiError {
    fn from(err: np_core::Error) -> Self {
        use np_core::Error;

        let status = match &err {
            Error::MissingRate(_) | Error::InvalidRate { .. } | Error::Config(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Io(_)
            | Error::Serialization(_)
            | Error::Storage(_)
            | Error::Export(_)
            | Error::External(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl From<np_export::ExportError> for ApiError {
    fn from(err: np_export::ExportError) -> Self {
        np_core::Error::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.status.canonical_reason().unwrap_or("error").to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

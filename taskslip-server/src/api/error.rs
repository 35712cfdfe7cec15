use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::printing::{PrintingError, ValidationError};

/// Errors a request handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be decoded
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },

    #[error(transparent)]
    Printing(#[from] PrintingError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Printing(PrintingError::Validation(err))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { status, .. } => *status,
            ApiError::Printing(err) => match err {
                PrintingError::Validation(_) => StatusCode::BAD_REQUEST,
                PrintingError::Hardware(_) => StatusCode::SERVICE_UNAVAILABLE,
                PrintingError::NotInitialized
                | PrintingError::HardwareUnavailable(_)
                | PrintingError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message shown to the user
    pub fn detail(&self) -> String {
        match self {
            ApiError::Printing(PrintingError::Hardware(e)) => {
                format!("Error printing: {}", e)
            }
            other => other.to_string(),
        }
    }

    /// Record the failure before it leaves the process
    pub(crate) fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Print request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Print request rejected");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorResponse {
            status: "error",
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use taskslip_printer::PrintError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(ValidationError::EmptyTitle),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(PrintingError::Hardware(PrintError::Offline("gone".into()))),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::from(PrintingError::NotInitialized),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(PrintingError::HardwareUnavailable("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }

    #[test]
    fn test_detail_messages() {
        assert_eq!(
            ApiError::from(ValidationError::EmptyTitle).detail(),
            "Title must not be empty"
        );
        assert_eq!(
            ApiError::from(PrintingError::Hardware(PrintError::Offline("gone".into()))).detail(),
            "Error printing: Printer offline: gone"
        );
    }
}

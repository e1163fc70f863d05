//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use hireloop_types::error::{ApplicantError, InterviewError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Hiring manager rejected or failed a message.
    Interview(InterviewError),
    /// Applicant agent failed.
    Applicant(ApplicantError),
    /// The handler task died before producing a result.
    Internal(String),
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        AppError::Interview(e)
    }
}

impl From<ApplicantError> for AppError {
    fn from(e: ApplicantError) -> Self {
        AppError::Applicant(e)
    }
}

impl AppError {
    /// Status, machine-readable code and message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Interview(e) => {
                let status = match e {
                    InterviewError::InvalidShape(_) | InterviewError::MissingRoute(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    InterviewError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    InterviewError::UpstreamFailure(_) | InterviewError::DeliveryFailure(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, e.code(), e.to_string())
            }
            AppError::Applicant(ApplicantError::NotStarted) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                ApplicantError::NotStarted.to_string(),
            ),
            AppError::Applicant(e) => (StatusCode::BAD_GATEWAY, "APPLICANT_ERROR", e.to_string()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, %message, "request failed");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0);
        let body = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#.to_string()
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn interview_errors_map_to_statuses() {
        assert_eq!(
            status_of(InterviewError::InvalidShape("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(InterviewError::Unauthorized("x".into()).into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(InterviewError::MissingRoute("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(InterviewError::UpstreamFailure("x".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(InterviewError::DeliveryFailure("x".into()).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn missing_route_keeps_its_code() {
        let (_, code, _) = AppError::from(InterviewError::MissingRoute("no route".into())).parts();
        assert_eq!(code, "MISSING_ROUTE");
    }

    #[test]
    fn not_started_is_a_validation_error() {
        let (status, code, message) = AppError::from(ApplicantError::NotStarted).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert!(message.contains("send 'start'"));
    }

    #[test]
    fn internal_is_500() {
        assert_eq!(
            status_of(AppError::Internal("task failed".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

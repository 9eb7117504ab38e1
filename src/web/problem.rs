use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{HeaderValue, StatusCode, header};
use serde::Serialize;

use crate::core::{FieldViolation, PatientError};

pub type ApiResult<T> = Result<T, ApiProblem>;

/// `application/problem+json` error body for every failed request.
#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    kind: &'static str,
    detail: String,
    violations: Vec<FieldViolation>,
}

impl ApiProblem {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "https://patientdb.dev/problems/internal",
            detail,
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        kind: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title,
            kind,
            detail: detail.into(),
            violations: Vec::new(),
        }
    }
}

impl From<PatientError> for ApiProblem {
    fn from(error: PatientError) -> Self {
        match error {
            PatientError::NotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                "Not found",
                "https://patientdb.dev/problems/not-found",
                format!("Patient '{}' not found", id),
            ),
            PatientError::Conflict(id) => Self::new(
                StatusCode::CONFLICT,
                "Conflict",
                "https://patientdb.dev/problems/conflict",
                format!("Patient with ID '{}' already exists", id),
            ),
            PatientError::Validation(err) => {
                let mut problem = Self::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Validation failed",
                    "https://patientdb.dev/problems/validation",
                    err.to_string(),
                );
                problem.violations = err.violations().to_vec();
                problem
            }
            PatientError::BadRequest(detail) => Self::new(
                StatusCode::BAD_REQUEST,
                "Bad request",
                "https://patientdb.dev/problems/bad-request",
                detail,
            ),
            PatientError::Storage(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error",
                "https://patientdb.dev/problems/storage",
                detail,
            ),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<FieldViolation>,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                detail = %self.detail,
                "request failed"
            );
        }

        let payload = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            violations: self.violations,
        };

        let mut response = (self.status, Json(payload)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}

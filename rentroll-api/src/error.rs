//! Error handling for the API server
//!
//! All handlers return `ApiResult<T>`. Domain errors from the shared crate
//! map onto the matching variant, so a handler only needs `?`.
//!
//! Internal errors are logged and answered with a generic message. The
//! underlying detail rides along in the response extensions as
//! [`InternalErrorDetail`]; the `error_detail` middleware decides whether
//! it reaches the client.
//!
//! # Example
//!
//! ```no_run
//! use rentroll_api::error::{validate_request, ApiJson, ApiResult};
//! use axum::Json;
//! use rentroll_shared::models::property::CreateProperty;
//!
//! async fn handler(ApiJson(req): ApiJson<CreateProperty>) -> ApiResult<Json<CreateProperty>> {
//!     validate_request(&req)?;
//!     Ok(Json(req))
//! }
//! ```

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rentroll_shared::error::{DomainError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), e.g. malformed JSON
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,

    /// Internal error detail, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Detail of an internal error, attached to the 500 response's extensions
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

impl ErrorResponse {
    pub(crate) fn internal(stack: Option<String>) -> Self {
        Self {
            error: "internal_error".to_string(),
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            details: None,
            stack,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => {
                let message = match errors.as_slice() {
                    [only] => only.message.clone(),
                    _ => "Request validation failed".to_string(),
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation_error",
                    message,
                    Some(errors),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");

                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal(None)),
                )
                    .into_response();
                response.extensions_mut().insert(InternalErrorDetail(msg));
                return response;
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
            stack: None,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err.kind {
            ErrorKind::NotFound => ApiError::NotFound(err.message),
            ErrorKind::ValidationFailure => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message: err.message,
            }]),
            ErrorKind::Unhandled => ApiError::InternalError(err.message),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::from(err).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

/// Body that could not be read as the expected JSON
///
/// Well-formed JSON with wrong field types (a non-numeric rent, say) is a
/// validation failure; anything else is a bad request.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message: err.body_text(),
            }]),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Path segment that did not parse, e.g. an id that is not a UUID
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error format
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Runs `validator` rules on a request body
pub fn validate_request<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentroll_shared::models::property::CreateProperty;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Unit not found".to_string());
        assert_eq!(err.to_string(), "Not found: Unit not found");
    }

    #[test]
    fn test_domain_error_mapping() {
        let err: ApiError = DomainError::not_found("Lease").into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Lease not found"));

        let err: ApiError = DomainError::validation("Tenant name is required").into();
        assert!(matches!(err, ApiError::ValidationError(ref d) if d.len() == 1));

        let err: ApiError = DomainError::unhandled("boom").into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ValidationError(vec![]).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_carries_detail() {
        let response = ApiError::InternalError("connection reset".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert_eq!(detail.0, "connection reset");
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let req = CreateProperty {
            name: String::new(),
            address: String::new(),
            ..Default::default()
        };

        let err = validate_request(&req).unwrap_err();
        match err {
            ApiError::ValidationError(details) => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["address", "name"]);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}

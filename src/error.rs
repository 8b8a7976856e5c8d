//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, giving every failure a single
//! place where it is mapped onto an HTTP status and a JSON `{message, ...}`
//! body.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can
//! return `Result<_, AppError>` and middleware can surface it with `.into()`.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! and `bcrypt::BcryptError` keep the `?` operator usable at every layer.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Every failure the application can surface to a client.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or incomplete request body, invalid filter tag, and other
    /// client-side mistakes (HTTP 400).
    BadRequest(String),
    /// Failed field validation, carrying the per-field error map (HTTP 400).
    Validation(ValidationErrors),
    /// A resource that must be unique already exists, such as a duplicate
    /// signup email (HTTP 400).
    Conflict(String),
    /// Authentication failed or the caller is not logged in (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist, or exists but is not owned by
    /// the caller (HTTP 404). The two cases are indistinguishable on the wire.
    NotFound(String),
    /// An error originating from the database layer (HTTP 500).
    DatabaseError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation Error: {}", errors),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Validation failures keep their per-field detail under an `errors` key;
/// everything else is a plain `{message}` body.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "message": msg
            })),
            AppError::Validation(errors) => HttpResponse::BadRequest().json(json!({
                "message": "Invalid Data",
                "errors": errors
            })),
            AppError::Conflict(msg) => HttpResponse::BadRequest().json(json!({
                "message": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "message": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "message": msg
            })),
            // Database detail stays server-side; the client sees a generic 500.
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(json!({
                "message": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "message": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`; every other
/// database error becomes `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(errors)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// Covers failures during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 2))]
        field: String,
    }

    #[test]
    fn test_error_responses() {
        let error = AppError::BadRequest("Invalid filter type".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Conflict("User already exists".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Forbidden("You are not logged in".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::InternalServerError("Server error".into());
        assert_eq!(error.error_response().status(), 500);

        let error = AppError::DatabaseError("pool exhausted".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let probe = Probe {
            field: "x".to_string(),
        };
        let error: AppError = probe.validate().unwrap_err().into();
        assert_eq!(error.error_response().status(), 400);
        assert!(error.to_string().starts_with("Validation Error"));
    }
}

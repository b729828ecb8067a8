//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the
//! application. Domain errors carry an explicit status and message and are
//! translated 1:1 into HTTP responses in a single place; everything
//! unexpected collapses into a generic 500 whose detail is logged
//! server-side but never returned to the caller.
//!
//! `AppError` implements `actix_web::error::ResponseError`, and `From`
//! conversions exist for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` so handlers can
//! use the `?` operator freely.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All error conditions the API can surface.
#[derive(Debug)]
pub enum AppError {
    /// Input validation failed before any persistence call (HTTP 400).
    /// Carries one message per failing field.
    Validation(Vec<String>),
    /// Malformed or invalid request outside field validation, e.g. an
    /// unknown status value (HTTP 400).
    BadRequest(String),
    /// Missing, malformed or rejected credentials (HTTP 401).
    Unauthorized(String),
    /// The endpoint exists but is refused in this environment (HTTP 403).
    Forbidden(String),
    /// Requested resource absent or not visible to the requester (HTTP 404).
    NotFound(String),
    /// A uniqueness rule was violated (HTTP 409).
    Conflict(String),
    /// Database failure (HTTP 500, detail logged, not returned).
    Database(String),
    /// Any other unexpected failure (HTTP 500, detail logged, not returned).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msgs) => write!(f, "Validation failed: {}", msgs.join(", ")),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(messages) => HttpResponse::BadRequest().json(json!({
                "error": "Validation failed",
                "messages": messages
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            // Server-side failures keep their detail in the logs only.
            AppError::Database(msg) | AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error."
                }))
            }
        }
    }
}

/// Maps `sqlx::Error` onto the domain taxonomy.
///
/// `RowNotFound` becomes `NotFound`; unique-constraint violations (two
/// requests racing on the same tag name or email) become `Conflict`;
/// foreign-key violations mean the referenced parent is gone and read as
/// `NotFound`. Everything else is a `Database` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found.".into()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    AppError::Conflict("Resource already exists.".into())
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    AppError::NotFound("Referenced record not found.".into())
                }
                _ => AppError::Database(error.to_string()),
            },
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Flattens `validator::ValidationErrors` into one message per failing
/// field, so the response reports all of them, not just the first.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value ({})", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized("Invalid token.".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("bcrypt failure: {}", error))
    }
}

//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! backend. Each variant is a distinguishable error kind carrying a
//! human-readable message, and `AppError` implements
//! `actix_web::error::ResponseError` so handlers can return it directly and
//! have it rendered as a JSON error response with the right status code.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` let handlers use
//! the `?` operator on those fallible calls.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All error kinds the backend can surface to a caller.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request (e.g. undeserializable body) — HTTP 400.
    BadRequest(String),
    /// Input failed boundary validation — HTTP 422.
    ValidationError(String),
    /// The email is already registered — HTTP 409.
    DuplicateEmail(String),
    /// Login failed. Deliberately a single kind for both "no such email"
    /// and "wrong password" so account existence does not leak — HTTP 401.
    InvalidCredentials,
    /// A protected call without a usable identity — HTTP 401.
    Unauthorized(String),
    /// Token signature or structure is invalid — HTTP 401.
    InvalidToken(String),
    /// Token was valid once but is past its expiry — HTTP 401.
    TokenExpired(String),
    /// The referenced record does not exist for this caller — HTTP 404.
    NotFound(String),
    /// Storage-layer failure — HTTP 500.
    DatabaseError(String),
    /// Any other unexpected server-side failure — HTTP 500.
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateEmail(msg) => write!(f, "Duplicate Email: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidToken(msg) => write!(f, "Invalid Token: {}", msg),
            AppError::TokenExpired(msg) => write!(f, "Token Expired: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AppError::DuplicateEmail(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            })),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::InvalidToken(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::TokenExpired(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            // Storage errors are presented as generic internal errors.
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// `sqlx::Error::RowNotFound` maps to `NotFound`; everything else is a
/// storage failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// JWT failures keep the expired/invalid distinction so callers can tell a
/// stale session from a forged one.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::TokenExpired("Token expired".into())
            }
            _ => AppError::InvalidToken(format!("Invalid token: {}", error)),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

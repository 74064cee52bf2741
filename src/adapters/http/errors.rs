use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::{AuthError, AuthErrorKind};
use crate::domain::invoice::InvoiceError;

/// Error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Malformed request (400 Bad Request)
  Validation(String),

  /// Authentication failure
  Auth(AuthErrorKind),

  /// Unknown resource (404 Not Found)
  NotFound(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::NotFound(what) => write!(f, "Not found: {}", what),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::CredentialsSignin | AuthErrorKind::SessionRequired => {
          StatusCode::UNAUTHORIZED
        }
        AuthErrorKind::AccessDenied => StatusCode::FORBIDDEN,
        AuthErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Validation(msg) => msg.clone(),
      ApiError::Auth(AuthErrorKind::CredentialsSignin) => "Invalid credentials.".to_string(),
      ApiError::Auth(AuthErrorKind::SessionRequired) => "Please sign in.".to_string(),
      ApiError::Auth(AuthErrorKind::AccessDenied) => "Access denied.".to_string(),
      ApiError::Auth(AuthErrorKind::Configuration) => "Something went wrong.".to_string(),
      ApiError::NotFound(_) => "Not found.".to_string(),
      ApiError::Internal(msg) => {
        // Details stay in the log
        tracing::error!("Internal error: {}", msg);
        "Something went wrong.".to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::plaintext())
      .body(message)
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error.kind() {
      Some(kind) => ApiError::Auth(kind),
      None => ApiError::Internal(error.to_string()),
    }
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::InvoiceNotFound(id) => ApiError::NotFound(format!("invoice {}", id)),
      InvoiceError::Validation(e) => ApiError::Internal(format!("Corrupt invoice data: {}", e)),
      InvoiceError::Repository(msg) => ApiError::Internal(msg),
      InvoiceError::Database(e) => ApiError::Internal(e.to_string()),
    }
  }
}

impl From<tera::Error> for ApiError {
  fn from(error: tera::Error) -> Self {
    ApiError::Internal(format!("Template error: {:?}", error))
  }
}

//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A submitted form or uploaded row is missing a required field.
  #[error("validation error: {0}")]
  Validation(String),
  #[error("not found")]
  NotFound,
  /// Uploaded click data does not have the expected columns.
  #[error("unexpected data shape: {0}")]
  DataShape(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  /// Request body exceeded the configured limit (in bytes).
  #[error("upload exceeds {0} bytes")]
  PayloadTooLarge(usize),
  #[error("template error: {0}")]
  Template(#[from] minijinja::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<foerder_core::Error> for Error {
  fn from(e: foerder_core::Error) -> Self {
    use foerder_core::Error as Core;
    match e {
      Core::MissingField(_) => Error::Validation(e.to_string()),
      Core::DataShape(_) => Error::DataShape(e.to_string()),
      Core::UnknownCategory(_) | Core::Csv(_) => {
        Error::BadRequest(e.to_string())
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
      Error::DataShape(msg) => {
        (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::PayloadTooLarge(limit) => (
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("upload exceeds {limit} bytes"),
      )
        .into_response(),
      Error::Template(e) => {
        tracing::error!(error = %e, "template rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
          .into_response()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
          .into_response()
      }
    }
  }
}

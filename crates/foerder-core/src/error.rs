//! Error types for `foerder-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required descriptive field was absent or blank.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  /// Uploaded click data lacks one or more expected columns.
  #[error("uploaded data is missing columns: {}", .0.join(", "))]
  DataShape(Vec<String>),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

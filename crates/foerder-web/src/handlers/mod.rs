pub mod dashboard;
pub mod records;
pub mod report;

use axum::{
  body::Bytes,
  extract::{Multipart, multipart::MultipartError},
  http::StatusCode,
};

use crate::{MAX_UPLOAD_BYTES, error::Error};

/// Name of the multipart field carrying an uploaded CSV file.
pub(super) const UPLOAD_FIELD: &str = "file";

/// Pull the bytes of the [`UPLOAD_FIELD`] part out of a multipart body.
pub(super) async fn read_upload(mut multipart: Multipart) -> Result<Bytes, Error> {
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(upload_error)?
  {
    if field.name() == Some(UPLOAD_FIELD) {
      return field.bytes().await.map_err(upload_error);
    }
  }
  Err(Error::BadRequest(format!("missing multipart field {UPLOAD_FIELD:?}")))
}

fn upload_error(e: MultipartError) -> Error {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    Error::PayloadTooLarge(MAX_UPLOAD_BYTES)
  } else {
    Error::BadRequest(e.body_text())
  }
}

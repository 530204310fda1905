//! Handlers for the record listing, the entry form, edit and delete.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Form plus listing of all records |
//! | `POST` | `/` | Form body; inserts and redirects to `/` |
//! | `GET`  | `/edit/{id}` | Pre-filled edit form; 404 if absent |
//! | `POST` | `/edit/{id}` | Form body; 404 if absent, else redirects to `/` |
//! | `GET`  | `/delete/{id}` | Always redirects to `/`; absent ids are a no-op |

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, Redirect},
};
use foerder_core::{
  record::{NewRecord, RecordId},
  store::FoerderStore,
};
use minijinja::context;
use serde::Deserialize;

use crate::{AppState, error::Error, templates::render};

// ─── Form ─────────────────────────────────────────────────────────────────────

/// URL-encoded body of the entry and edit forms. Every field is optional at
/// the extractor level so a missing one yields our own validation error
/// instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RecordForm {
  pub quelle:   Option<String>,
  pub bereich:  Option<String>,
  pub art:      Option<String>,
  pub programm: Option<String>,
}

impl TryFrom<RecordForm> for NewRecord {
  type Error = foerder_core::Error;

  fn try_from(f: RecordForm) -> Result<Self, Self::Error> {
    use foerder_core::Error::MissingField;

    let record = NewRecord {
      source:  f.quelle.ok_or(MissingField("source"))?,
      area:    f.bereich.ok_or(MissingField("area"))?,
      kind:    f.art.ok_or(MissingField("type"))?,
      program: f.programm.ok_or(MissingField("program"))?,
    }
    .trimmed();
    record.validate()?;
    Ok(record)
  }
}

// ─── List / create ────────────────────────────────────────────────────────────

/// `GET /`
pub async fn index<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state
    .store
    .list()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  render(&state.templates, "index.html", context! { records })
}

/// `POST /`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<RecordForm>,
) -> Result<Redirect, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewRecord::try_from(form)?;
  let record = state
    .store
    .insert(input)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(id = record.id, source = %record.source, "record created");
  Ok(Redirect::to("/"))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `GET /edit/{id}`
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<RecordId>,
) -> Result<Html<String>, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state
    .store
    .get(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  render(&state.templates, "edit.html", context! { record })
}

/// `POST /edit/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<RecordId>,
  Form(form): Form<RecordForm>,
) -> Result<Redirect, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = NewRecord::try_from(form)?;
  let changed = state
    .store
    .update(id, input)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  if !changed {
    return Err(Error::NotFound);
  }

  tracing::info!(id, "record updated");
  Ok(Redirect::to("/"))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `GET /delete/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<RecordId>,
) -> Result<Redirect, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = state
    .store
    .delete(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  if removed {
    tracing::info!(id, "record deleted");
  } else {
    tracing::debug!(id, "delete of absent record ignored");
  }
  Ok(Redirect::to("/"))
}

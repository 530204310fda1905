//! Reporting: aggregate chart, CSV export and CSV import.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/chart` | Optional `?by=source\|area\|type\|program`, `?style=bar\|radar` |
//! | `GET`  | `/export` | All records as a CSV attachment |
//! | `POST` | `/import` | Multipart field `file`, CSV in export format |

use axum::{
  extract::{Multipart, Query, State},
  http::header,
  response::{Html, IntoResponse, Redirect},
};
use foerder_core::{
  export::{read_records, write_records},
  record::Category,
  store::FoerderStore,
};
use minijinja::context;
use serde::Deserialize;

use crate::{
  AppState,
  chart::ChartStyle,
  error::Error,
  handlers::read_upload,
  templates::render,
};

pub const EXPORT_FILENAME: &str = "foerderdaten.csv";

// ─── Chart ────────────────────────────────────────────────────────────────────

/// Kept as raw strings so unknown values surface as our own 400 rather than
/// an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
  pub by:    Option<String>,
  pub style: Option<String>,
}

/// `GET /chart[?by=<category>][&style=bar|radar]`
pub async fn chart<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ChartParams>,
) -> Result<Html<String>, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let category = match params.by.as_deref() {
    Some(by) => by.parse::<Category>()?,
    None => Category::default(),
  };
  let style = match params.style.as_deref() {
    Some(style) => style.parse::<ChartStyle>()?,
    None => state.config.chart_style,
  };

  let counts = state
    .store
    .count_by(category)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let title = format!("Förderdaten nach {}", category.label());
  let svg = style.render(&state.templates, &counts, &title)?;

  let categories: Vec<_> = Category::ALL
    .into_iter()
    .map(|c| context! { value => c.as_str(), label => c.label() })
    .collect();

  render(&state.templates, "chart.html", context! {
    category       => category.as_str(),
    category_label => category.label(),
    style          => style.as_str(),
    categories,
    counts,
    chart          => minijinja::Value::from_safe_string(svg),
  })
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// `GET /export`
pub async fn export<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state
    .store
    .list()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let body = write_records(&records)?;

  tracing::info!(rows = records.len(), "exported records");
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{EXPORT_FILENAME}\""),
      ),
    ],
    body,
  ))
}

// ─── Import ───────────────────────────────────────────────────────────────────

/// `POST /import`: the whole file is stored in one transaction or not at all.
pub async fn import<S>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<Redirect, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let upload = read_upload(multipart).await?;
  let inputs = read_records(upload.as_ref())?;

  let stored = state
    .store
    .insert_many(inputs)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(rows = stored.len(), "imported records");
  Ok(Redirect::to("/"))
}

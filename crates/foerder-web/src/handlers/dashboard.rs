//! Click dashboard: CSV upload, preview and feature inspection.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboard` | Optional `?row=N` selects the inspected row |
//! | `POST` | `/dashboard/upload` | Multipart field `file`; replaces the click table |

use axum::{
  extract::{Multipart, Query, State},
  response::{Html, Redirect},
};
use foerder_core::{
  click::{
    ANOMALY_THRESHOLD, FeatureMatrix, REQUIRED_COLUMNS, anomalies_by_platform,
    parse_clicks,
  },
  store::FoerderStore,
};
use minijinja::context;
use serde::Deserialize;

use crate::{
  AppState, chart::bar_chart, error::Error, handlers::read_upload,
  templates::render,
};

/// Rows shown in the data preview table.
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub row: Option<usize>,
}

/// `GET /dashboard[?row=N]`
pub async fn page<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Html<String>, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let events = state
    .store
    .list_clicks()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  if events.is_empty() {
    return render(&state.templates, "dashboard.html", context! {
      total            => 0,
      required_columns => REQUIRED_COLUMNS,
    });
  }

  let matrix = FeatureMatrix::encode(&events);
  // Out-of-range selections snap to the last row.
  let selected = params.row.unwrap_or(0).min(matrix.len() - 1);
  let features = matrix.row(selected).unwrap_or_default();
  let anomalies = events.iter().filter(|e| e.anomaly).count();
  let chart = bar_chart(
    &state.templates,
    &anomalies_by_platform(&events),
    "Anomalien je Plattform",
  )?;
  let preview = &events[..events.len().min(PREVIEW_ROWS)];

  render(&state.templates, "dashboard.html", context! {
    total     => events.len(),
    anomalies,
    threshold => ANOMALY_THRESHOLD,
    preview,
    columns   => matrix.columns,
    selected,
    features,
    chart     => minijinja::Value::from_safe_string(chart),
  })
}

/// `POST /dashboard/upload`
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<Redirect, Error>
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let upload = read_upload(multipart).await?;
  let events = parse_clicks(upload.as_ref())?;
  let anomalies = events.iter().filter(|e| e.anomaly).count();

  let rows = state
    .store
    .replace_clicks(events)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(rows, anomalies, "click data replaced");
  Ok(Redirect::to("/dashboard"))
}

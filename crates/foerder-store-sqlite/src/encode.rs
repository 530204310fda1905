//! Decoding helpers between SQLite rows and domain types.
//!
//! The legacy schema declares every column nullable and older databases may
//! hold integers where this crate writes text, so rows are read loosely and
//! normalised here.

use foerder_core::{
  click::{ClickEvent, is_anomalous},
  record::{Category, FundingRecord},
};
use rusqlite::types::Value;

// ─── Category ────────────────────────────────────────────────────────────────

/// Column holding the given categorical field.
pub fn category_column(c: Category) -> &'static str {
  match c {
    Category::Source => "foerderquelle",
    Category::Area => "foerderbereich",
    Category::Kind => "foerderart",
    Category::Program => "programme",
  }
}

// ─── Loose values ────────────────────────────────────────────────────────────

/// Render any SQLite value as text; `NULL` and blobs become empty.
pub fn value_to_text(v: Value) -> String {
  match v {
    Value::Text(s) => s,
    Value::Integer(i) => i.to_string(),
    Value::Real(r) => r.to_string(),
    Value::Null | Value::Blob(_) => String::new(),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `foerderdaten` row.
pub struct RawRecord {
  pub id:      i64,
  pub source:  Option<String>,
  pub area:    Option<String>,
  pub kind:    Option<String>,
  pub program: Option<String>,
}

impl RawRecord {
  pub const COLUMNS: &'static str =
    "id, foerderquelle, foerderbereich, foerderart, programme";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      source:  row.get(1)?,
      area:    row.get(2)?,
      kind:    row.get(3)?,
      program: row.get(4)?,
    })
  }

  pub fn into_record(self) -> FundingRecord {
    FundingRecord {
      id:      self.id,
      source:  self.source.unwrap_or_default(),
      area:    self.area.unwrap_or_default(),
      kind:    self.kind.unwrap_or_default(),
      program: self.program.unwrap_or_default(),
    }
  }
}

/// Raw values read directly from a `klickdaten` row.
pub struct RawClick {
  pub timestamp:   Value,
  pub platform:    Value,
  pub topic_score: Option<f64>,
  pub clicks:      Option<i64>,
  pub anomaly:     Option<i64>,
}

impl RawClick {
  pub const COLUMNS: &'static str =
    "Uhrzeit, Plattform, Thema_Score, Klicks, Anomalie";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      timestamp:   row.get(0)?,
      platform:    row.get(1)?,
      topic_score: row.get(2)?,
      clicks:      row.get(3)?,
      anomaly:     row.get(4)?,
    })
  }

  pub fn into_event(self) -> ClickEvent {
    let clicks = self.clicks.unwrap_or_default();
    ClickEvent {
      timestamp: value_to_text(self.timestamp),
      platform: value_to_text(self.platform),
      topic_score: self.topic_score.unwrap_or_default(),
      clicks,
      // Rows written without a label get it recomputed.
      anomaly: self
        .anomaly
        .map_or_else(|| is_anomalous(clicks), |flag| flag != 0),
    }
  }
}

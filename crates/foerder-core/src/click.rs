//! Click events for the dashboard: CSV ingest, anomaly labelling and the
//! numeric feature matrix.
//!
//! An uploaded CSV must carry the columns in [`REQUIRED_COLUMNS`]; any other
//! columns are ignored. Numeric cells that fail to parse are coerced to zero
//! rather than rejected.

use std::{
  collections::{BTreeMap, BTreeSet},
  io,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, record::CategoryCount};

/// Rows with strictly more clicks than this are flagged as anomalous.
pub const ANOMALY_THRESHOLD: i64 = 800;

/// Header names an uploaded click CSV must contain.
pub const REQUIRED_COLUMNS: [&str; 4] =
  ["Uhrzeit", "Plattform", "Thema_Score", "Klicks"];

// ─── ClickEvent ──────────────────────────────────────────────────────────────

/// One row of the click table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
  /// Kept verbatim as uploaded; numeric coercion happens in
  /// [`FeatureMatrix::encode`].
  pub timestamp:   String,
  pub platform:    String,
  pub topic_score: f64,
  pub clicks:      i64,
  /// Derived from the uploaded click value: `> ANOMALY_THRESHOLD`.
  pub anomaly:     bool,
}

impl ClickEvent {
  pub fn new(
    timestamp: impl Into<String>,
    platform: impl Into<String>,
    topic_score: f64,
    clicks: i64,
  ) -> Self {
    Self {
      timestamp: timestamp.into(),
      platform: platform.into(),
      topic_score,
      clicks,
      anomaly: is_anomalous(clicks),
    }
  }
}

pub fn is_anomalous(clicks: i64) -> bool { clicks > ANOMALY_THRESHOLD }

// ─── Ingest ──────────────────────────────────────────────────────────────────

/// Parse an uploaded click CSV and label every row.
///
/// Fails with [`Error::DataShape`] listing every required column that is
/// absent from the header row.
pub fn parse_clicks<R: io::Read>(reader: R) -> Result<Vec<ClickEvent>> {
  let mut rdr = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .flexible(true)
    .from_reader(reader);

  let headers = rdr.headers()?.clone();
  let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
    .iter()
    .map(|name| headers.iter().position(|h| h == *name))
    .collect();

  let missing: Vec<String> = REQUIRED_COLUMNS
    .iter()
    .zip(&positions)
    .filter(|(_, pos)| pos.is_none())
    .map(|(name, _)| (*name).to_owned())
    .collect();
  if !missing.is_empty() {
    return Err(Error::DataShape(missing));
  }

  let index: Vec<usize> = positions.into_iter().flatten().collect();
  let (ts, platform, score, clicks) = (index[0], index[1], index[2], index[3]);

  let mut events = Vec::new();
  for record in rdr.records() {
    let record = record?;
    let cell = |i: usize| record.get(i).unwrap_or("");
    let raw_clicks = cell(clicks);
    let mut event = ClickEvent::new(
      cell(ts),
      cell(platform),
      coerce_f64(cell(score)),
      coerce_count(raw_clicks),
    );
    // Labelled from the uploaded value; the stored count is truncated.
    event.anomaly = coerce_f64(raw_clicks) > ANOMALY_THRESHOLD as f64;
    events.push(event);
  }

  Ok(events)
}

/// Parse a number, mapping anything non-numeric (or non-finite) to zero.
pub fn coerce_f64(s: &str) -> f64 {
  s.trim()
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .unwrap_or(0.0)
}

/// Parse an integer count; fractional input is truncated, garbage becomes 0.
pub fn coerce_count(s: &str) -> i64 {
  let s = s.trim();
  s.parse::<i64>()
    .unwrap_or_else(|_| coerce_f64(s).trunc() as i64)
}

/// Number of anomalous rows per platform, ordered by platform name.
/// Platforms without anomalies are listed with a zero count.
pub fn anomalies_by_platform(events: &[ClickEvent]) -> Vec<CategoryCount> {
  let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
  for e in events {
    *counts.entry(e.platform.as_str()).or_default() += u64::from(e.anomaly);
  }
  counts
    .into_iter()
    .map(|(platform, count)| CategoryCount::new(platform, count))
    .collect()
}

// ─── Feature matrix ──────────────────────────────────────────────────────────

/// Numeric predictors derived from click events, one row per event.
///
/// Columns are `Uhrzeit`, `Thema_Score`, `Klicks`, followed by one indicator
/// column per platform except the alphabetically first one. The anomaly label
/// is never a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureMatrix {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<f64>>,
}

impl FeatureMatrix {
  pub fn encode(events: &[ClickEvent]) -> Self {
    let platforms: BTreeSet<&str> =
      events.iter().map(|e| e.platform.as_str()).collect();
    // The first category is implied by all indicators being zero.
    let indicators: Vec<&str> = platforms.into_iter().skip(1).collect();

    let mut columns: Vec<String> = ["Uhrzeit", "Thema_Score", "Klicks"]
      .into_iter()
      .map(str::to_owned)
      .collect();
    columns.extend(indicators.iter().map(|p| format!("Plattform_{p}")));

    let rows = events
      .iter()
      .map(|e| {
        let mut row = vec![
          coerce_f64(&e.timestamp),
          e.topic_score,
          e.clicks as f64,
        ];
        row.extend(
          indicators
            .iter()
            .map(|p| if e.platform == *p { 1.0 } else { 0.0 }),
        );
        row
      })
      .collect();

    Self { columns, rows }
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Column-name/value pairs for one row.
  pub fn row(&self, index: usize) -> Option<Vec<(String, f64)>> {
    self.rows.get(index).map(|row| {
      self.columns.iter().cloned().zip(row.iter().copied()).collect()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = "\
Uhrzeit,Plattform,Thema_Score,Klicks
8,Instagram,0.4,900
9,Facebook,0.7,500
10,TikTok,abc,801
11,Instagram,0.1,800
";

  #[test]
  fn threshold_is_strict() {
    assert!(!is_anomalous(800));
    assert!(is_anomalous(801));
    assert!(is_anomalous(900));
    assert!(!is_anomalous(500));
  }

  #[test]
  fn parse_labels_rows() {
    let events = parse_clicks(SAMPLE.as_bytes()).unwrap();
    assert_eq!(events.len(), 4);

    let flags: Vec<bool> = events.iter().map(|e| e.anomaly).collect();
    assert_eq!(flags, [true, false, true, false]);

    assert_eq!(events[0].platform, "Instagram");
    assert_eq!(events[0].clicks, 900);
    // Non-numeric score is coerced rather than rejected.
    assert_eq!(events[2].topic_score, 0.0);
  }

  #[test]
  fn parse_ignores_extra_columns_and_order() {
    let csv = "Klicks,Extra,Plattform,Uhrzeit,Thema_Score\n950,x,Web,12,0.5\n";
    let events = parse_clicks(csv.as_bytes()).unwrap();
    assert_eq!(events, [ClickEvent::new("12", "Web", 0.5, 950)]);
    assert!(events[0].anomaly);
  }

  #[test]
  fn parse_reports_all_missing_columns() {
    let csv = "Uhrzeit,Plattform\n8,Web\n";
    let err = parse_clicks(csv.as_bytes()).unwrap_err();
    match err {
      Error::DataShape(missing) => {
        assert_eq!(missing, ["Thema_Score", "Klicks"]);
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn fractional_clicks_above_threshold_are_flagged() {
    let csv = "Uhrzeit,Plattform,Thema_Score,Klicks\n8,Web,0.4,800.5\n9,Web,0.4,800.0\n";
    let events = parse_clicks(csv.as_bytes()).unwrap();
    assert_eq!(events[0].clicks, 800);
    assert!(events[0].anomaly);
    assert!(!events[1].anomaly);
  }

  #[test]
  fn coerce_count_handles_fractions_and_garbage() {
    assert_eq!(coerce_count("900"), 900);
    assert_eq!(coerce_count("900.7"), 900);
    assert_eq!(coerce_count("n/a"), 0);
    assert_eq!(coerce_count(""), 0);
  }

  #[test]
  fn anomalies_grouped_by_platform() {
    let events = parse_clicks(SAMPLE.as_bytes()).unwrap();
    let counts = anomalies_by_platform(&events);
    assert_eq!(counts, [
      CategoryCount::new("Facebook", 0),
      CategoryCount::new("Instagram", 1),
      CategoryCount::new("TikTok", 1),
    ]);
  }

  #[test]
  fn encode_drops_first_platform() {
    let events = parse_clicks(SAMPLE.as_bytes()).unwrap();
    let matrix = FeatureMatrix::encode(&events);

    assert_eq!(matrix.columns, [
      "Uhrzeit",
      "Thema_Score",
      "Klicks",
      "Plattform_Instagram",
      "Plattform_TikTok",
    ]);
    assert_eq!(matrix.len(), 4);
    assert_eq!(matrix.rows[0], [8.0, 0.4, 900.0, 1.0, 0.0]);
    // Facebook is the dropped reference category.
    assert_eq!(matrix.rows[1], [9.0, 0.7, 500.0, 0.0, 0.0]);
  }

  #[test]
  fn encode_coerces_text_timestamps() {
    let events = [ClickEvent::new("14:30", "Web", 0.2, 10)];
    let matrix = FeatureMatrix::encode(&events);
    assert_eq!(matrix.columns, ["Uhrzeit", "Thema_Score", "Klicks"]);
    assert_eq!(matrix.rows[0], [0.0, 0.2, 10.0]);
  }

  #[test]
  fn row_pairs_names_with_values() {
    let events = [ClickEvent::new("3", "Web", 0.5, 42)];
    let matrix = FeatureMatrix::encode(&events);
    let row = matrix.row(0).unwrap();
    assert_eq!(row[2], ("Klicks".to_owned(), 42.0));
    assert!(matrix.row(1).is_none());
  }
}

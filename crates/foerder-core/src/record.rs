//! Funding records — the rows of the Förderdaten table.
//!
//! A record carries four free-text descriptive fields plus an identifier that
//! the store assigns on insert. Edits overwrite all four fields in place; there
//! is no history.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned identifier; unique and immutable once created.
pub type RecordId = i64;

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted funding entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingRecord {
  pub id:      RecordId,
  /// Where the money comes from (e.g. "EU", "Land").
  pub source:  String,
  pub area:    String,
  /// Kind of funding (e.g. "Zuschuss", "Darlehen").
  #[serde(rename = "type")]
  pub kind:    String,
  pub program: String,
}

impl FundingRecord {
  pub fn from_parts(id: RecordId, input: NewRecord) -> Self {
    Self {
      id,
      source: input.source,
      area: input.area,
      kind: input.kind,
      program: input.program,
    }
  }

  /// The value of the given categorical field.
  pub fn category(&self, category: Category) -> &str {
    match category {
      Category::Source => &self.source,
      Category::Area => &self.area,
      Category::Kind => &self.kind,
      Category::Program => &self.program,
    }
  }
}

// ─── NewRecord ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::FoerderStore::insert`] and
/// [`crate::store::FoerderStore::update`]. The id is never accepted from
/// callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
  pub source:  String,
  pub area:    String,
  #[serde(rename = "type")]
  pub kind:    String,
  pub program: String,
}

impl NewRecord {
  pub fn new(
    source: impl Into<String>,
    area: impl Into<String>,
    kind: impl Into<String>,
    program: impl Into<String>,
  ) -> Self {
    Self {
      source:  source.into(),
      area:    area.into(),
      kind:    kind.into(),
      program: program.into(),
    }
  }

  /// Fails with [`Error::MissingField`] naming the first blank field.
  pub fn validate(&self) -> Result<()> {
    let fields = [
      ("source", &self.source),
      ("area", &self.area),
      ("type", &self.kind),
      ("program", &self.program),
    ];
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
      Some(&(name, _)) => Err(Error::MissingField(name)),
      None => Ok(()),
    }
  }

  /// Trim surrounding whitespace from every field.
  pub fn trimmed(self) -> Self {
    Self {
      source:  self.source.trim().to_owned(),
      area:    self.area.trim().to_owned(),
      kind:    self.kind.trim().to_owned(),
      program: self.program.trim().to_owned(),
    }
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// The categorical field records are grouped by for charting.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  #[default]
  Source,
  Area,
  #[serde(rename = "type")]
  Kind,
  Program,
}

impl Category {
  pub const ALL: [Category; 4] =
    [Self::Source, Self::Area, Self::Kind, Self::Program];

  /// The query-string form, matching the serde names.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Source => "source",
      Self::Area => "area",
      Self::Kind => "type",
      Self::Program => "program",
    }
  }

  /// Human-readable label shown in the UI.
  pub fn label(self) -> &'static str {
    match self {
      Self::Source => "Quelle",
      Self::Area => "Bereich",
      Self::Kind => "Art",
      Self::Program => "Programm",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| Error::UnknownCategory(s.to_owned()))
  }
}

/// Number of records sharing one value of a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
  pub label: String,
  pub count: u64,
}

impl CategoryCount {
  pub fn new(label: impl Into<String>, count: u64) -> Self {
    Self { label: label.into(), count }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_accepts_complete_record() {
    let r = NewRecord::new("EU", "Sport", "Zuschuss", "Badesee");
    assert!(r.validate().is_ok());
  }

  #[test]
  fn validate_names_first_blank_field() {
    let r = NewRecord::new("EU", "  ", "", "Badesee");
    assert!(matches!(r.validate(), Err(Error::MissingField("area"))));

    let r = NewRecord::new("EU", "Sport", "", "Badesee");
    assert!(matches!(r.validate(), Err(Error::MissingField("type"))));
  }

  #[test]
  fn trimmed_strips_whitespace() {
    let r = NewRecord::new(" EU ", "Sport\n", "\tZuschuss", "Badesee").trimmed();
    assert_eq!(r, NewRecord::new("EU", "Sport", "Zuschuss", "Badesee"));
  }

  #[test]
  fn category_parses_query_names() {
    assert_eq!("source".parse::<Category>().unwrap(), Category::Source);
    assert_eq!("type".parse::<Category>().unwrap(), Category::Kind);
    assert!(matches!(
      "kind".parse::<Category>(),
      Err(Error::UnknownCategory(s)) if s == "kind"
    ));
  }

  #[test]
  fn record_category_accessor() {
    let r = FundingRecord::from_parts(
      7,
      NewRecord::new("EU", "Sport", "Zuschuss", "Badesee"),
    );
    assert_eq!(r.category(Category::Kind), "Zuschuss");
    assert_eq!(r.category(Category::Program), "Badesee");
  }
}

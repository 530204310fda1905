//! [`SqliteStore`] — the SQLite implementation of [`FoerderStore`].

use std::path::Path;

use foerder_core::{
  click::ClickEvent,
  record::{Category, CategoryCount, FundingRecord, NewRecord, RecordId},
  store::FoerderStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{RawClick, RawRecord, category_column},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Förderdaten store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// runs as one closure on the connection's thread, so statements from
/// concurrent requests are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FoerderStore impl ───────────────────────────────────────────────────────

impl FoerderStore for SqliteStore {
  type Error = crate::Error;

  // ── Records ───────────────────────────────────────────────────────────────

  async fn insert(&self, input: NewRecord) -> Result<FundingRecord> {
    input.validate()?;

    let NewRecord { source, area, kind, program } = input.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO foerderdaten (foerderquelle, foerderbereich, foerderart, programme)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![source, area, kind, program],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted record");
    Ok(FundingRecord::from_parts(id, input))
  }

  async fn insert_many(
    &self,
    inputs: Vec<NewRecord>,
  ) -> Result<Vec<FundingRecord>> {
    for input in &inputs {
      input.validate()?;
    }

    let rows = inputs.clone();
    let ids: Vec<RecordId> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(rows.len());
        {
          let mut stmt = tx.prepare(
            "INSERT INTO foerderdaten (foerderquelle, foerderbereich, foerderart, programme)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for r in &rows {
            stmt.execute(rusqlite::params![r.source, r.area, r.kind, r.program])?;
            ids.push(tx.last_insert_rowid());
          }
        }
        tx.commit()?;
        Ok(ids)
      })
      .await?;

    tracing::debug!(rows = ids.len(), "inserted record batch");
    Ok(
      ids
        .into_iter()
        .zip(inputs)
        .map(|(id, input)| FundingRecord::from_parts(id, input))
        .collect(),
    )
  }

  async fn list(&self) -> Result<Vec<FundingRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM foerderdaten ORDER BY id",
          RawRecord::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawRecord::into_record).collect())
  }

  async fn get(&self, id: RecordId) -> Result<Option<FundingRecord>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM foerderdaten WHERE id = ?1",
                RawRecord::COLUMNS
              ),
              rusqlite::params![id],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawRecord::into_record))
  }

  async fn update(&self, id: RecordId, input: NewRecord) -> Result<bool> {
    input.validate()?;

    let NewRecord { source, area, kind, program } = input;
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE foerderdaten
              SET foerderquelle = ?1, foerderbereich = ?2, foerderart = ?3, programme = ?4
            WHERE id = ?5",
          rusqlite::params![source, area, kind, program, id],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete(&self, id: RecordId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM foerderdaten WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn count_by(&self, category: Category) -> Result<Vec<CategoryCount>> {
    // The column name comes from a closed mapping, never from user input.
    let column = category_column(category);

    let counts = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT COALESCE({column}, ''), COUNT(*)
             FROM foerderdaten
            GROUP BY 1
            ORDER BY 1"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CategoryCount {
              label: row.get(0)?,
              count: row.get::<_, i64>(1)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(counts)
  }

  // ── Clicks ────────────────────────────────────────────────────────────────

  async fn replace_clicks(&self, events: Vec<ClickEvent>) -> Result<usize> {
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM klickdaten", [])?;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT INTO klickdaten ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
            RawClick::COLUMNS
          ))?;
          for e in &events {
            stmt.execute(rusqlite::params![
              e.timestamp,
              e.platform,
              e.topic_score,
              e.clicks,
              e.anomaly,
            ])?;
          }
        }
        tx.commit()?;
        Ok(events.len())
      })
      .await?;

    tracing::debug!(rows = written, "replaced click table");
    Ok(written)
  }

  async fn list_clicks(&self) -> Result<Vec<ClickEvent>> {
    let raws: Vec<RawClick> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM klickdaten ORDER BY rowid",
          RawClick::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawClick::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawClick::into_event).collect())
  }
}

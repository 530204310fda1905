//! The `FoerderStore` trait.
//!
//! Implemented by storage backends (e.g. `foerder-store-sqlite`). The web layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  click::ClickEvent,
  record::{Category, CategoryCount, FundingRecord, NewRecord, RecordId},
};

/// Abstraction over the persisted state of the application: the funding
/// record table and the click table.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FoerderStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Records ───────────────────────────────────────────────────────────

  /// Validate and persist a new record, returning it with its assigned id.
  fn insert(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<FundingRecord, Self::Error>> + Send + '_;

  /// Validate and persist several records in one transaction. Either every
  /// record is stored or none is.
  fn insert_many(
    &self,
    inputs: Vec<NewRecord>,
  ) -> impl Future<Output = Result<Vec<FundingRecord>, Self::Error>> + Send + '_;

  /// All records in natural storage order (ascending id).
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<FundingRecord>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<FundingRecord>, Self::Error>> + Send + '_;

  /// Overwrite the four descriptive fields of a record.
  ///
  /// Returns `false` and changes nothing if `id` does not exist.
  fn update(
    &self,
    id: RecordId,
    input: NewRecord,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove a record. Returns `false` if it was already absent.
  fn delete(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Count records per distinct value of `category`, ordered by value.
  fn count_by(
    &self,
    category: Category,
  ) -> impl Future<Output = Result<Vec<CategoryCount>, Self::Error>> + Send + '_;

  // ── Clicks ────────────────────────────────────────────────────────────

  /// Replace the whole click table with `events` atomically. Returns the
  /// number of rows written.
  fn replace_clicks(
    &self,
    events: Vec<ClickEvent>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// All click events in upload order.
  fn list_clicks(
    &self,
  ) -> impl Future<Output = Result<Vec<ClickEvent>, Self::Error>> + Send + '_;
}

//! CSV export and import of funding records.
//!
//! The export format is a header row `id,source,area,type,program` followed by
//! one line per record. Import accepts the same format and ignores the `id`
//! column, since identifiers are always assigned by the store.

use std::io;

use crate::{
  Result,
  record::{FundingRecord, NewRecord},
};

pub const EXPORT_HEADER: [&str; 5] = ["id", "source", "area", "type", "program"];

/// Serialise `records` as CSV, header included even when empty.
pub fn write_records(records: &[FundingRecord]) -> Result<Vec<u8>> {
  let mut writer = csv::WriterBuilder::new()
    .has_headers(false)
    .from_writer(Vec::new());

  writer.write_record(EXPORT_HEADER)?;
  for record in records {
    writer.serialize(record)?;
  }

  writer
    .into_inner()
    .map_err(|e| csv::Error::from(e.into_error()).into())
}

/// Parse CSV in the export format into validated, trimmed inputs.
///
/// Fails on the first row with a blank field; nothing is returned partially.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<NewRecord>> {
  let mut rdr = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(reader);

  let mut records = Vec::new();
  for row in rdr.deserialize::<NewRecord>() {
    let record = row?.trimmed();
    record.validate()?;
    records.push(record);
  }
  Ok(records)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn sample() -> Vec<FundingRecord> {
    vec![
      FundingRecord::from_parts(
        1,
        NewRecord::new("EU", "Sport", "Zuschuss", "Badesee"),
      ),
      FundingRecord::from_parts(
        2,
        NewRecord::new("Land", "Kultur, Bildung", "Darlehen", "Museum"),
      ),
    ]
  }

  #[test]
  fn export_writes_header_and_rows() {
    let bytes = write_records(&sample()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id,source,area,type,program"));
    assert_eq!(lines.next(), Some("1,EU,Sport,Zuschuss,Badesee"));
    // Embedded commas are quoted.
    assert_eq!(
      lines.next(),
      Some("2,Land,\"Kultur, Bildung\",Darlehen,Museum")
    );
    assert_eq!(lines.next(), None);
  }

  #[test]
  fn export_of_empty_table_has_header() {
    let bytes = write_records(&[]).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "id,source,area,type,program\n");
  }

  #[test]
  fn export_then_import_preserves_fields() {
    let records = sample();
    let bytes = write_records(&records).unwrap();
    let imported = read_records(bytes.as_slice()).unwrap();

    let expected: Vec<NewRecord> = records
      .into_iter()
      .map(|r| NewRecord::new(r.source, r.area, r.kind, r.program))
      .collect();
    assert_eq!(imported, expected);
  }

  #[test]
  fn import_accepts_reordered_columns_without_id() {
    let csv = "program,type,area,source\nBadesee,Zuschuss,Sport,EU\n";
    let imported = read_records(csv.as_bytes()).unwrap();
    assert_eq!(imported, [NewRecord::new("EU", "Sport", "Zuschuss", "Badesee")]);
  }

  #[test]
  fn import_rejects_blank_field() {
    let csv = "source,area,type,program\nEU,,Zuschuss,Badesee\n";
    assert!(matches!(
      read_records(csv.as_bytes()),
      Err(Error::MissingField("area"))
    ));
  }

  #[test]
  fn import_rejects_missing_column() {
    let csv = "source,area,type\nEU,Sport,Zuschuss\n";
    assert!(matches!(read_records(csv.as_bytes()), Err(Error::Csv(_))));
  }
}

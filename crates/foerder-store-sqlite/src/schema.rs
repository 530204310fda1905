//! SQL schema for the Förderdaten SQLite store.
//!
//! Table and column names match the files written by earlier deployments, so
//! an existing `foerdermatrix.db` opens without migration.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS foerderdaten (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    foerderquelle   TEXT,   -- source
    foerderbereich  TEXT,   -- area
    foerderart      TEXT,   -- type
    programme       TEXT    -- program
);

-- Replaced wholesale on every dashboard upload.
CREATE TABLE IF NOT EXISTS klickdaten (
    Uhrzeit      TEXT,
    Plattform    TEXT,
    Thema_Score  REAL,
    Klicks       INTEGER,
    Anomalie     INTEGER   -- 1 when Klicks > 800
);

PRAGMA user_version = 1;
";

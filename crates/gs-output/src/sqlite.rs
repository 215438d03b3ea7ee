//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `trajectories`, `locations` and `metadata`.

use std::path::Path;

use rusqlite::Connection;

use crate::row::TIMESTAMP_FORMAT;
use crate::writer::OutputWriter;
use crate::{LocationRow, MetadataRow, OutputResult, SampleRow};

/// Writes generator output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS trajectories (
                 user_id   INTEGER NOT NULL,
                 timestamp TEXT    NOT NULL,
                 lon       REAL    NOT NULL,
                 lat       REAL    NOT NULL,
                 profile   TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS locations (
                 network     TEXT    NOT NULL,
                 loc_type    TEXT    NOT NULL,
                 external_id INTEGER NOT NULL,
                 lon         REAL    NOT NULL,
                 lat         REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS metadata (
                 user_id              INTEGER PRIMARY KEY,
                 home_external_id     INTEGER NOT NULL,
                 work_external_id     INTEGER NOT NULL,
                 regular_external_ids TEXT    NOT NULL,
                 profile              TEXT    NOT NULL,
                 network              TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_samples(&mut self, rows: &[SampleRow<'_>]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trajectories (user_id, timestamp, lon, lat, profile) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.user_id,
                    row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    row.lon,
                    row.lat,
                    row.profile,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_locations(&mut self, rows: &[LocationRow<'_>]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO locations (network, loc_type, external_id, lon, lat) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.network, row.loc_type, row.external_id, row.lon, row.lat])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_metadata(&mut self, row: &MetadataRow<'_>) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO metadata \
             (user_id, home_external_id, work_external_id, regular_external_ids, profile, network) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.user_id,
                row.home_external_id,
                row.work_external_id,
                row.regular_ids_text(),
                row.profile,
                row.network,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `trajectories.csv`
//! - `locations.csv`
//! - `metadata.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::TIMESTAMP_FORMAT;
use crate::writer::OutputWriter;
use crate::{LocationRow, MetadataRow, OutputResult, SampleRow};

/// Writes generator output to three CSV files.
pub struct CsvWriter {
    samples:   Writer<File>,
    locations: Writer<File>,
    metadata:  Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut samples = Writer::from_path(dir.join("trajectories.csv"))?;
        samples.write_record(["user_id", "timestamp", "lon", "lat", "profile"])?;

        let mut locations = Writer::from_path(dir.join("locations.csv"))?;
        locations.write_record(["network", "loc_type", "external_id", "lon", "lat"])?;

        let mut metadata = Writer::from_path(dir.join("metadata.csv"))?;
        metadata.write_record([
            "user_id",
            "home_external_id",
            "work_external_id",
            "regular_external_ids",
            "profile",
            "network",
        ])?;

        Ok(Self { samples, locations, metadata, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_samples(&mut self, rows: &[SampleRow<'_>]) -> OutputResult<()> {
        for row in rows {
            self.samples.write_record(&[
                row.user_id.to_string(),
                row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                row.lon.to_string(),
                row.lat.to_string(),
                row.profile.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_locations(&mut self, rows: &[LocationRow<'_>]) -> OutputResult<()> {
        for row in rows {
            self.locations.write_record(&[
                row.network.to_owned(),
                row.loc_type.to_owned(),
                row.external_id.to_string(),
                row.lon.to_string(),
                row.lat.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_metadata(&mut self, row: &MetadataRow<'_>) -> OutputResult<()> {
        self.metadata.write_record(&[
            row.user_id.to_string(),
            row.home_external_id.to_string(),
            row.work_external_id.to_string(),
            row.regular_ids_text(),
            row.profile.to_owned(),
            row.network.to_owned(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.samples.flush()?;
        self.locations.flush()?;
        self.metadata.flush()?;
        Ok(())
    }
}

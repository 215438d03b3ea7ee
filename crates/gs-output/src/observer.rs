//! `OutputObserver<W>` — bridges `RunObserver` to an `OutputWriter`.

use gs_sim::{AgentReport, NetworkEntry, RunObserver, RunSummary};

use crate::row::{LocationRow, MetadataRow, SampleRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`RunObserver`] that writes trajectories, network location tables and
/// user metadata to any [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// The runner reports users in ascending id order and each trajectory in
/// time order, so the written samples are sorted by `(user_id, timestamp)`.
///
/// Errors from the writer are stored internally because `RunObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].  Once an error is stored, later writes
/// are skipped.
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::error!("output: {e}");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_agent(&mut self, report: &AgentReport<'_>) -> OutputResult<()> {
        let (home, work, regular) = report.agent.anchors.external_ids(report.catalogs)?;
        self.writer.write_metadata(&MetadataRow {
            user_id:              report.agent.id.0,
            home_external_id:     home,
            work_external_id:     work,
            regular_external_ids: regular,
            profile:              report.profile,
            network:              report.network,
        })?;

        let rows: Vec<SampleRow<'_>> = report
            .samples
            .iter()
            .map(|s| SampleRow {
                user_id:   s.agent.0,
                timestamp: s.timestamp,
                lon:       s.lon,
                lat:       s.lat,
                profile:   report.profile,
            })
            .collect();
        self.writer.write_samples(&rows)
    }
}

impl<W: OutputWriter> RunObserver for OutputObserver<W> {
    fn on_network(&mut self, entry: &NetworkEntry) {
        if self.last_error.is_some() {
            return;
        }
        let rows: Vec<LocationRow<'_>> = [&entry.catalogs.home_work, &entry.catalogs.events]
            .into_iter()
            .flat_map(|catalog| {
                catalog.iter().map(move |loc| {
                    let g = entry.network.to_geographic(loc.centroid);
                    LocationRow {
                        network:     &entry.name,
                        loc_type:    catalog.kind().as_str(),
                        external_id: loc.external_id,
                        lon:         g.lon,
                        lat:         g.lat,
                    }
                })
            })
            .collect();
        let result = self.writer.write_locations(&rows);
        self.store_err(result);
    }

    fn on_agent(&mut self, report: &AgentReport<'_>) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.write_agent(report);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

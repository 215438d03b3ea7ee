//! The `OutputWriter` trait implemented by all backend writers.

use crate::{LocationRow, MetadataRow, OutputResult, SampleRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with [`OutputObserver::take_error`][crate::OutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of trajectory samples.
    fn write_samples(&mut self, rows: &[SampleRow<'_>]) -> OutputResult<()>;

    /// Write the locations of one network.
    fn write_locations(&mut self, rows: &[LocationRow<'_>]) -> OutputResult<()>;

    /// Write the anchors of one user.
    fn write_metadata(&mut self, row: &MetadataRow<'_>) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: OutputWriter + ?Sized> OutputWriter for Box<W> {
    fn write_samples(&mut self, rows: &[SampleRow<'_>]) -> OutputResult<()> {
        (**self).write_samples(rows)
    }

    fn write_locations(&mut self, rows: &[LocationRow<'_>]) -> OutputResult<()> {
        (**self).write_locations(rows)
    }

    fn write_metadata(&mut self, row: &MetadataRow<'_>) -> OutputResult<()> {
        (**self).write_metadata(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

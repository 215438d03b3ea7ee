//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `trajectories.parquet`
//! - `locations.parquet`
//! - `metadata.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Float64Builder, Int64Builder, ListBuilder, StringBuilder, TimestampSecondBuilder, UInt32Builder,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{LocationRow, MetadataRow, OutputResult, SampleRow};

fn sample_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("user_id",   DataType::UInt32,                               false),
        Field::new("timestamp", DataType::Timestamp(TimeUnit::Second, None),    false),
        Field::new("lon",       DataType::Float64,                              false),
        Field::new("lat",       DataType::Float64,                              false),
        Field::new("profile",   DataType::Utf8,                                 false),
    ]))
}

fn location_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("network",     DataType::Utf8,    false),
        Field::new("loc_type",    DataType::Utf8,    false),
        Field::new("external_id", DataType::Int64,   false),
        Field::new("lon",         DataType::Float64, false),
        Field::new("lat",         DataType::Float64, false),
    ]))
}

fn metadata_schema() -> Arc<Schema> {
    let item = Field::new("item", DataType::Int64, true);
    Arc::new(Schema::new(vec![
        Field::new("user_id",              DataType::UInt32,                  false),
        Field::new("home_external_id",     DataType::Int64,                   false),
        Field::new("work_external_id",     DataType::Int64,                   false),
        Field::new("regular_external_ids", DataType::List(Arc::new(item)),    false),
        Field::new("profile",              DataType::Utf8,                    false),
        Field::new("network",              DataType::Utf8,                    false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes generator output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
/// Metadata rows are buffered and written as one batch by `finish()`.
pub struct ParquetWriter {
    samples:         Option<ArrowWriter<File>>,
    locations:       Option<ArrowWriter<File>>,
    metadata:        Option<ArrowWriter<File>>,
    sample_schema:   Arc<Schema>,
    location_schema: Arc<Schema>,
    metadata_schema: Arc<Schema>,
    pending_meta:    Vec<PendingMetadata>,
}

/// An owned [`MetadataRow`] waiting for `finish()`.
struct PendingMetadata {
    user_id: u32,
    home:    i64,
    work:    i64,
    regular: Vec<i64>,
    profile: String,
    network: String,
}

impl ParquetWriter {
    /// Create the three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let sample_schema = sample_schema();
        let location_schema = location_schema();
        let metadata_schema = metadata_schema();

        Ok(Self {
            samples: Some(open(dir, "trajectories.parquet", &sample_schema)?),
            locations: Some(open(dir, "locations.parquet", &location_schema)?),
            metadata: Some(open(dir, "metadata.parquet", &metadata_schema)?),
            sample_schema,
            location_schema,
            metadata_schema,
            pending_meta: Vec::new(),
        })
    }

    fn flush_metadata(&mut self) -> OutputResult<()> {
        let Some(writer) = self.metadata.as_mut() else {
            return Ok(());
        };
        if self.pending_meta.is_empty() {
            return Ok(());
        }

        let mut user_ids = UInt32Builder::new();
        let mut homes    = Int64Builder::new();
        let mut works    = Int64Builder::new();
        let mut regulars = ListBuilder::new(Int64Builder::new());
        let mut profiles = StringBuilder::new();
        let mut networks = StringBuilder::new();

        for row in &self.pending_meta {
            user_ids.append_value(row.user_id);
            homes.append_value(row.home);
            works.append_value(row.work);
            regulars.values().append_slice(&row.regular);
            regulars.append(true);
            profiles.append_value(&row.profile);
            networks.append_value(&row.network);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.metadata_schema),
            vec![
                Arc::new(user_ids.finish()),
                Arc::new(homes.finish()),
                Arc::new(works.finish()),
                Arc::new(regulars.finish()),
                Arc::new(profiles.finish()),
                Arc::new(networks.finish()),
            ],
        )?;
        writer.write(&batch)?;
        self.pending_meta.clear();
        Ok(())
    }
}

impl OutputWriter for ParquetWriter {
    fn write_samples(&mut self, rows: &[SampleRow<'_>]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.samples.as_mut() else {
            return Ok(());
        };

        let mut user_ids   = UInt32Builder::new();
        let mut timestamps = TimestampSecondBuilder::new();
        let mut lons       = Float64Builder::new();
        let mut lats       = Float64Builder::new();
        let mut profiles   = StringBuilder::new();

        for row in rows {
            user_ids.append_value(row.user_id);
            timestamps.append_value(row.timestamp.and_utc().timestamp());
            lons.append_value(row.lon);
            lats.append_value(row.lat);
            profiles.append_value(row.profile);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.sample_schema),
            vec![
                Arc::new(user_ids.finish()),
                Arc::new(timestamps.finish()),
                Arc::new(lons.finish()),
                Arc::new(lats.finish()),
                Arc::new(profiles.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_locations(&mut self, rows: &[LocationRow<'_>]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.locations.as_mut() else {
            return Ok(());
        };

        let mut networks = StringBuilder::new();
        let mut types    = StringBuilder::new();
        let mut ids      = Int64Builder::new();
        let mut lons     = Float64Builder::new();
        let mut lats     = Float64Builder::new();

        for row in rows {
            networks.append_value(row.network);
            types.append_value(row.loc_type);
            ids.append_value(row.external_id);
            lons.append_value(row.lon);
            lats.append_value(row.lat);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.location_schema),
            vec![
                Arc::new(networks.finish()),
                Arc::new(types.finish()),
                Arc::new(ids.finish()),
                Arc::new(lons.finish()),
                Arc::new(lats.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_metadata(&mut self, row: &MetadataRow<'_>) -> OutputResult<()> {
        self.pending_meta.push(PendingMetadata {
            user_id: row.user_id,
            home:    row.home_external_id,
            work:    row.work_external_id,
            regular: row.regular_external_ids.clone(),
            profile: row.profile.to_owned(),
            network: row.network.to_owned(),
        });
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.flush_metadata()?;
        for writer in [&mut self.samples, &mut self.locations, &mut self.metadata] {
            if let Some(w) = writer.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}

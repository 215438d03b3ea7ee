//! Output directory handling and backend selection.

use std::fs;
use std::path::Path;

use gs_sim::{OutputConfig, OutputFormat};

use crate::writer::OutputWriter;
use crate::{CsvWriter, OutputError, OutputResult};

/// Create `dir` if missing.  With `clear`, everything already inside it is
/// removed first.
pub fn prepare_output_dir(dir: &Path, clear: bool) -> OutputResult<()> {
    if clear && dir.exists() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        log::info!("cleared output directory {}", dir.display());
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Prepare `config.dir` and open the writer for `config.format`.
///
/// Fails with [`OutputError::FormatUnavailable`] when the format's Cargo
/// feature is not enabled.
pub fn open_writer(config: &OutputConfig) -> OutputResult<Box<dyn OutputWriter>> {
    prepare_output_dir(&config.dir, config.clear)?;
    let dir = config.dir.as_path();
    log::info!("writing {} output to {}", config.format, dir.display());

    match config.format {
        OutputFormat::Csv => Ok(Box::new(CsvWriter::new(dir)?)),

        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => Ok(Box::new(crate::ParquetWriter::new(dir)?)),

        #[cfg(feature = "sqlite")]
        OutputFormat::Sqlite => Ok(Box::new(crate::SqliteWriter::new(dir)?)),

        #[allow(unreachable_patterns)]
        other => Err(OutputError::FormatUnavailable(other)),
    }
}

//! `gs-output` — output writers for the gps_synth generator.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                                   |
//! |-----------|-------------|-----------------------------------------------------------------|
//! | *(none)*  | CSV         | `trajectories.csv`, `locations.csv`, `metadata.csv`             |
//! | `sqlite`  | SQLite      | `output.db`                                                     |
//! | `parquet` | Parquet     | `trajectories.parquet`, `locations.parquet`, `metadata.parquet` |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`OutputObserver`], which implements `gs_sim::RunObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gs_output::{OutputObserver, open_writer};
//!
//! let writer = open_writer(&config.output)?;
//! let mut obs = OutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod dir;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use dir::{open_writer, prepare_output_dir};
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use row::{LocationRow, MetadataRow, SampleRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;

//! Plain data row types written by output backends.

use chrono::NaiveDateTime;

/// Timestamp layout of text backends.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One GPS sample of one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow<'a> {
    pub user_id:   u32,
    pub timestamp: NaiveDateTime,
    pub lon:       f64,
    pub lat:       f64,
    pub profile:   &'a str,
}

/// One catalog location of a network, in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRow<'a> {
    pub network:     &'a str,
    /// `"hw"` or `"event"`.
    pub loc_type:    &'a str,
    pub external_id: i64,
    pub lon:         f64,
    pub lat:         f64,
}

/// The anchors of one user, by external location id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow<'a> {
    pub user_id:              u32,
    pub home_external_id:     i64,
    pub work_external_id:     i64,
    pub regular_external_ids: Vec<i64>,
    pub profile:              &'a str,
    pub network:              &'a str,
}

impl MetadataRow<'_> {
    /// Regular ids joined with `;`, as stored by text backends.
    pub fn regular_ids_text(&self) -> String {
        self.regular_external_ids.iter().map(i64::to_string).collect::<Vec<_>>().join(";")
    }
}

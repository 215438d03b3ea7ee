//! Run configuration, read from TOML.
//!
//! ```toml
//! seed = 42
//!
//! [output]
//! dir    = "output"
//! format = "csv"          # csv | parquet | sqlite
//! clear  = true
//!
//! [[network]]
//! name   = "downtown"
//! crs    = { local = { lon = -88.04, lat = 30.69 } }   # or { epsg = 32616 }
//! source = { kind = "grid", rows = 20, cols = 20, spacing_m = 120.0, home_work = 400, events = 600 }
//!
//! [[profile]]
//! name             = "walkers"
//! network          = "downtown"
//! num_users        = 100
//! date_begin       = "2023-12-04"
//! date_end         = "2023-12-10"
//! speed_mps        = 1.4
//! road_proximity_m = 5.0
//! anchor_policy    = { kind = "buffer_containment", radius_home_work = 800.0, radius_home_regular = 500.0 }
//! on_failure       = "skip"
//! ```
//!
//! Relative CSV paths of a network source are resolved against the directory
//! of the configuration file by [`RunConfig::load`].

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use gs_agent::{AgentConfig, AnchorPolicy, ItineraryWeights, MobilityProfile, RetryLimits, ScheduleRules};
use gs_core::{Crs, DateRange, GeoPoint};

use crate::{SimError, SimResult};

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration of one generator run.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    /// Master seed.  Every user's randomness derives from it and the user id.
    pub seed:     u64,
    #[serde(default)]
    pub output:   OutputConfig,
    #[serde(default, rename = "network")]
    pub networks: Vec<NetworkConfig>,
    #[serde(default, rename = "profile")]
    pub profiles: Vec<ProfileConfig>,
}

impl RunConfig {
    /// Parse a configuration from TOML text.  Does not validate.
    pub fn from_toml(text: &str) -> SimResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SimError::ReadConfig { path: path.to_path_buf(), source })?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Make relative network source paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for net in &mut self.networks {
            if let NetworkSource::Csv { nodes, edges, locations } = &mut net.source {
                for p in [nodes, edges, locations] {
                    if p.is_relative() {
                        *p = base.join(&*p);
                    }
                }
            }
        }
    }

    /// Reject empty or duplicated names, dangling network references, empty
    /// populations and anything [`ProfileConfig::validate`] rejects.
    pub fn validate(&self) -> SimResult<()> {
        let bad = |msg: String| Err(SimError::Config(msg));

        if self.profiles.is_empty() {
            return bad("no profiles configured".to_owned());
        }

        let mut names = HashSet::new();
        for net in &self.networks {
            if net.name.is_empty() {
                return bad("network with an empty name".to_owned());
            }
            if !names.insert(net.name.as_str()) {
                return bad(format!("duplicate network `{}`", net.name));
            }
            net.crs.resolve()?;
            net.source.validate(&net.name)?;
        }

        let mut profiles = HashSet::new();
        for p in &self.profiles {
            if p.name.is_empty() {
                return bad("profile with an empty name".to_owned());
            }
            if !profiles.insert(p.name.as_str()) {
                return bad(format!("duplicate profile `{}`", p.name));
            }
            if !names.contains(p.network.as_str()) {
                return Err(SimError::UnknownNetwork(p.network.clone()));
            }
            if p.num_users == 0 {
                return bad(format!("profile `{}` has no users", p.name));
            }
            p.validate()?;
        }
        Ok(())
    }

    /// Total number of users across all profiles.
    pub fn total_users(&self) -> u64 {
        self.profiles.iter().map(|p| p.num_users as u64).sum()
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir:    PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    /// Delete the directory's contents before writing.
    #[serde(default)]
    pub clear:  bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir(), format: OutputFormat::default(), clear: false }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
    Sqlite,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
            OutputFormat::Sqlite => "sqlite",
        })
    }
}

// ── Networks ──────────────────────────────────────────────────────────────────

/// A named street network plus its location catalogs.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkConfig {
    pub name:   String,
    pub crs:    CrsConfig,
    pub source: NetworkSource,
}

/// The projected CRS of a network's coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrsConfig {
    /// A WGS-84 UTM zone.
    Epsg(u32),
    /// Metres east/north of a geographic origin.
    Local { lon: f64, lat: f64 },
}

impl CrsConfig {
    pub fn resolve(&self) -> SimResult<Crs> {
        match *self {
            CrsConfig::Epsg(code) => Ok(Crs::from_epsg(code)?),
            CrsConfig::Local { lon, lat } => {
                let origin = GeoPoint::new(lon, lat);
                if !origin.is_valid() {
                    return Err(SimError::Config(format!("local CRS origin ({lon}, {lat}) is not a valid position")));
                }
                Ok(Crs::Local { origin })
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkSource {
    /// Nodes, edges and locations read from CSV files.
    Csv { nodes: PathBuf, edges: PathBuf, locations: PathBuf },
    /// A synthetic grid with randomly scattered locations.
    Grid { rows: usize, cols: usize, spacing_m: f64, home_work: usize, events: usize },
}

impl NetworkSource {
    fn validate(&self, name: &str) -> SimResult<()> {
        match *self {
            NetworkSource::Csv { .. } => Ok(()),
            NetworkSource::Grid { rows, cols, spacing_m, home_work, events } => {
                if rows == 0 || cols == 0 || !(spacing_m > 0.0) {
                    return Err(SimError::Config(format!(
                        "network `{name}`: grid needs rows, cols and spacing above zero"
                    )));
                }
                if home_work < 2 || events == 0 {
                    return Err(SimError::Config(format!(
                        "network `{name}`: grid needs at least 2 home/work and 1 event location"
                    )));
                }
                Ok(())
            }
        }
    }
}

// ── Profiles ──────────────────────────────────────────────────────────────────

/// What to do when one user of a profile cannot be simulated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, drop the user and carry on.
    #[default]
    Skip,
    /// Stop the run with the failure.
    Abort,
}

/// A named population sharing one network and one set of parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct ProfileConfig {
    pub name:             String,
    pub network:          String,
    pub num_users:        u32,
    pub date_begin:       NaiveDate,
    pub date_end:         NaiveDate,
    pub speed_mps:        f64,
    pub road_proximity_m: f64,
    pub anchor_policy:    AnchorPolicy,
    #[serde(default)]
    pub schedule:         ScheduleRules,
    #[serde(default)]
    pub itinerary:        ItineraryWeights,
    #[serde(default)]
    pub on_failure:       FailurePolicy,
    #[serde(default)]
    pub limits:           RetryLimits,
}

impl ProfileConfig {
    /// The per-user configuration shared by this profile's users.
    ///
    /// Fails on an inverted date range.
    /// Motion parameters, schedule rules, anchor policy, date range and
    /// retry caps.
    pub fn validate(&self) -> SimResult<()> {
        self.agent_config()?.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    pub fn agent_config(&self) -> SimResult<AgentConfig> {
        let dates = DateRange::new(self.date_begin, self.date_end)?;
        let profile = MobilityProfile {
            speed_mps:        self.speed_mps,
            road_proximity_m: self.road_proximity_m,
            schedule:         self.schedule.clone(),
            itinerary:        self.itinerary.clone(),
        };
        Ok(AgentConfig::new(dates, profile, self.anchor_policy.clone()))
    }
}

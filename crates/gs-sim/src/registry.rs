//! Named networks shared by profiles.

use std::collections::HashMap;

use gs_core::{Crs, SimRng};
use gs_spatial::synthetic::{GridSpec, grid_network, scatter_catalogs};
use gs_spatial::{CatalogPair, SpatialResult, StreetNetwork, loader};

use crate::config::{NetworkConfig, NetworkSource};
use crate::{SimError, SimResult};

/// A street network and the location catalogs snapped to it.
#[derive(Debug)]
pub struct NetworkEntry {
    pub name:     String,
    pub network:  StreetNetwork,
    pub catalogs: CatalogPair,
}

/// Every network of a run, built once and read-only afterwards.
///
/// Profiles refer to networks by name; all profiles naming the same network
/// borrow the same entry.
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    entries: Vec<NetworkEntry>,
    by_name: HashMap<String, usize>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured network.
    ///
    /// Synthetic grids draw their locations from a child of `SimRng::new(seed)`
    /// per network, in configuration order.
    pub fn build(configs: &[NetworkConfig], seed: u64) -> SimResult<Self> {
        let rng = SimRng::new(seed);
        let mut registry = Self::new();
        for (i, cfg) in configs.iter().enumerate() {
            let mut net_rng = rng.child(i as u64);
            let crs = cfg.crs.resolve()?;
            let (network, catalogs) = load(&cfg.source, crs, &mut net_rng)
                .map_err(|source| SimError::Network { name: cfg.name.clone(), source })?;
            log::info!(
                "network `{}`: {} nodes, {} edges, {} home/work and {} event locations",
                cfg.name,
                network.node_count(),
                network.edge_count(),
                catalogs.home_work.len(),
                catalogs.events.len()
            );
            registry.insert(cfg.name.clone(), network, catalogs)?;
        }
        Ok(registry)
    }

    /// Add a network.  Names must be unique.
    pub fn insert(&mut self, name: String, network: StreetNetwork, catalogs: CatalogPair) -> SimResult<()> {
        if self.by_name.contains_key(&name) {
            return Err(SimError::Config(format!("duplicate network `{name}`")));
        }
        self.by_name.insert(name.clone(), self.entries.len());
        self.entries.push(NetworkEntry { name, network, catalogs });
        Ok(())
    }

    pub fn get(&self, name: &str) -> SimResult<&NetworkEntry> {
        self.by_name
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| SimError::UnknownNetwork(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load(source: &NetworkSource, crs: Crs, rng: &mut SimRng) -> SpatialResult<(StreetNetwork, CatalogPair)> {
    match source {
        NetworkSource::Csv { nodes, edges, locations } => {
            let network = loader::load_network_csv(nodes, edges, crs)?;
            let catalogs = loader::load_locations_csv(locations, &network)?;
            Ok((network, catalogs))
        }
        &NetworkSource::Grid { rows, cols, spacing_m, home_work, events } => {
            let network = grid_network(&GridSpec::new(rows, cols, spacing_m), crs)?;
            let catalogs = scatter_catalogs(&network, home_work, events, rng)?;
            Ok((network, catalogs))
        }
    }
}

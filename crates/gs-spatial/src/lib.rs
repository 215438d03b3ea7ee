//! `gs-spatial` — street network, location catalogs, routing, and the
//! geometry used to place samples along routes.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`network`]   | `StreetNetwork` (CSR + R-tree), `StreetNetworkBuilder`      |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`, `shortest_route` |
//! | [`geometry`]  | `interpolate_points`, `sample_noisy_point`                  |
//! | [`catalog`]   | `LocationCatalog`, `LocationEntry`, `CatalogPair`           |
//! | [`loader`]    | CSV readers for nodes, edges and locations                  |
//! | [`synthetic`] | grid networks and scattered locations for demos and tests   |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                          |
//!
//! All coordinates handled here are projected metres in the network's
//! [`Crs`](gs_core::Crs).  Conversion to longitude/latitude happens only
//! through [`StreetNetwork::to_geographic`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `gs-core` ids.          |

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod network;
pub mod router;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogKind, CatalogPair, LocationCatalog, LocationEntry};
pub use error::{SpatialError, SpatialResult};
pub use geometry::{DEFAULT_MAX_SAMPLE_ATTEMPTS, interpolate_points, sample_noisy_point};
pub use network::{StreetNetwork, StreetNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router, shortest_route};

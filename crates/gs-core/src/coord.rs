//! Coordinate types.
//!
//! Two coordinate spaces coexist:
//!
//! - **Projected** ([`Point`]): planar `x`/`y` in the street network's CRS,
//!   in metres.  All geometry (interpolation, buffers, distances) happens
//!   here.
//! - **Geographic** ([`GeoPoint`]): WGS-84 longitude/latitude in degrees.
//!   Only emitted samples and exported tables use this space.
//!
//! [`crate::Crs`] converts between the two.

/// A planar point in the network's projected CRS (metres).
pub type Point = geo::Point<f64>;

/// A WGS-84 geographic coordinate, longitude first.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Mean Earth radius in metres.
    pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Self::EARTH_RADIUS_M * c
    }

    /// `true` if both components are finite and inside the WGS-84 domain.
    pub fn is_valid(self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

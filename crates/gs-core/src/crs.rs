//! Projected coordinate reference systems and their transform to WGS-84.
//!
//! A street network is built in a planar, metre-based CRS so that buffers,
//! interpolation and distances are plain Euclidean geometry.  Every emitted
//! sample is converted back to longitude/latitude through the network's
//! [`Crs`], which is fixed for the lifetime of the network.
//!
//! Two families are supported:
//!
//! | Variant        | Use                                                      |
//! |----------------|----------------------------------------------------------|
//! | `Utm`          | WGS-84 UTM zones (EPSG 326zz north, 327zz south)         |
//! | `Local`        | equirectangular frame tangent at an origin (tests, demos)|
//!
//! The UTM transforms use the Snyder series (USGS Professional Paper 1395,
//! pp. 61–64), accurate to well under a millimetre inside a zone.

use crate::{CoreError, CoreResult, GeoPoint, Point};

// WGS-84 ellipsoid.
const A: f64 = 6_378_137.0;
const F: f64 = 1.0 / 298.257_223_563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A projected CRS bound to a street network.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Crs {
    /// Universal Transverse Mercator on the WGS-84 ellipsoid.
    Utm { zone: u8, north: bool },
    /// Equirectangular projection centred on `origin`: `x` metres east,
    /// `y` metres north of it.  Exact inverse; adequate for a few km.
    Local { origin: GeoPoint },
}

impl Crs {
    /// Resolve a WGS-84 UTM EPSG code (`32601..=32660`, `32701..=32760`).
    pub fn from_epsg(code: u32) -> CoreResult<Self> {
        let (zone, north) = match code {
            32601..=32660 => (code - 32600, true),
            32701..=32760 => (code - 32700, false),
            _ => return Err(CoreError::UnsupportedEpsg(code)),
        };
        Ok(Crs::Utm { zone: zone as u8, north })
    }

    /// The UTM zone containing `p` (ignores the Norway/Svalbard exceptions).
    pub fn utm_for(p: GeoPoint) -> Self {
        let zone = (((p.lon + 180.0) / 6.0).floor() as i64).clamp(0, 59) as u8 + 1;
        Crs::Utm { zone, north: p.lat >= 0.0 }
    }

    /// EPSG code, if this CRS has one.
    pub fn epsg(&self) -> Option<u32> {
        match *self {
            Crs::Utm { zone, north: true } => Some(32600 + zone as u32),
            Crs::Utm { zone, north: false } => Some(32700 + zone as u32),
            Crs::Local { .. } => None,
        }
    }

    /// Projected `(x, y)` → WGS-84 longitude/latitude.
    pub fn to_geographic(&self, p: Point) -> GeoPoint {
        match *self {
            Crs::Utm { zone, north } => utm_inverse(p.x(), p.y(), zone, north),
            Crs::Local { origin } => {
                let r = GeoPoint::EARTH_RADIUS_M;
                let lat = origin.lat + (p.y() / r).to_degrees();
                let lon = origin.lon + (p.x() / (r * origin.lat.to_radians().cos())).to_degrees();
                GeoPoint::new(lon, lat)
            }
        }
    }

    /// WGS-84 longitude/latitude → projected `(x, y)`.
    pub fn to_projected(&self, g: GeoPoint) -> Point {
        match *self {
            Crs::Utm { zone, north } => utm_forward(g, zone, north),
            Crs::Local { origin } => {
                let r = GeoPoint::EARTH_RADIUS_M;
                let x = (g.lon - origin.lon).to_radians() * r * origin.lat.to_radians().cos();
                let y = (g.lat - origin.lat).to_radians() * r;
                Point::new(x, y)
            }
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crs::Utm { .. } => write!(f, "EPSG:{}", self.epsg().unwrap_or_default()),
            Crs::Local { origin } => write!(f, "local{origin}"),
        }
    }
}

// ── UTM internals ─────────────────────────────────────────────────────────────

#[inline]
fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

fn meridian_arc(phi: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

fn utm_forward(g: GeoPoint, zone: u8, north: bool) -> Point {
    let e2 = F * (2.0 - F);
    let ep2 = e2 / (1.0 - e2);

    let phi = g.lat.to_radians();
    let lambda = g.lon.to_radians();
    let lambda0 = central_meridian(zone).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let n = A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = phi.tan().powi(2);
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lambda - lambda0);
    let m = meridian_arc(phi, e2);

    let x = K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;

    let mut y = K0
        * (m + n
            * phi.tan()
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    if !north {
        y += FALSE_NORTHING_SOUTH;
    }
    Point::new(x, y)
}

fn utm_inverse(x: f64, y: f64, zone: u8, north: bool) -> GeoPoint {
    let e2 = F * (2.0 - F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let y = if north { y } else { y - FALSE_NORTHING_SOUTH };
    let m = y / K0;
    let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1me2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let c1 = ep2 * cos_phi1 * cos_phi1;
    let t1 = phi1.tan().powi(2);
    let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = A / denom.sqrt();
    let r1 = A * (1.0 - e2) / denom.powf(1.5);
    let d = (x - FALSE_EASTING) / (n1 * K0);

    let phi = phi1
        - (n1 * phi1.tan() / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let lambda = central_meridian(zone).to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    GeoPoint::new(lambda.to_degrees(), phi.to_degrees())
}

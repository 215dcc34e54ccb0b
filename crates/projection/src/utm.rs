//! Universal Transverse Mercator on the WGS84 ellipsoid.
//!
//! Simulation rasters are delivered in the local UTM zone (zone 45N for the
//! Mahanadi basin). Conversions use the Snyder series expansions, accurate to
//! well under a millimetre inside a zone.
//!
//! Zone parameters:
//! - Central meridian: `(zone - 1) * 6 - 180 + 3` degrees
//! - Scale factor on the central meridian: 0.9996
//! - False easting 500 km, false northing 10 000 km in the south

use std::f64::consts::PI;

/// WGS84 semi-major axis (meters)
const A: f64 = 6378137.0;
/// WGS84 flattening
const F: f64 = 1.0 / 298.257223563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A single UTM zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utm {
    pub zone: u8,
    pub north: bool,
    /// Central meridian in radians
    lon0: f64,
}

impl Utm {
    pub fn new(zone: u8, north: bool) -> Self {
        let lon0_deg = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
        Self {
            zone,
            north,
            lon0: lon0_deg * PI / 180.0,
        }
    }

    /// Central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        self.lon0 * 180.0 / PI
    }

    /// Easting/northing (meters) → (lon, lat) in degrees.
    pub fn to_geographic(&self, easting: f64, northing: f64) -> (f64, f64) {
        let e2 = F * (2.0 - F);
        let ep2 = e2 / (1.0 - e2);

        let x = easting - FALSE_EASTING;
        let y = if self.north {
            northing
        } else {
            northing - FALSE_NORTHING_SOUTH
        };

        // Footpoint latitude
        let m = y / K0;
        let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
        let sq = (1.0 - e2).sqrt();
        let e1 = (1.0 - sq) / (1.0 + sq);

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin1 = phi1.sin();
        let cos1 = phi1.cos();
        let tan1 = phi1.tan();

        let n1 = A / (1.0 - e2 * sin1 * sin1).sqrt();
        let t1 = tan1 * tan1;
        let c1 = ep2 * cos1 * cos1;
        let r1 = A * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
        let d = x / (n1 * K0);

        let lat = phi1
            - (n1 * tan1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / cos1;

        (lon * 180.0 / PI, lat * 180.0 / PI)
    }

    /// (lon, lat) in degrees → easting/northing (meters).
    pub fn from_geographic(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let e2 = F * (2.0 - F);
        let ep2 = e2 / (1.0 - e2);

        let phi = lat_deg * PI / 180.0;
        let lam = lon_deg * PI / 180.0;

        let sin = phi.sin();
        let cos = phi.cos();
        let tan = phi.tan();

        let n = A / (1.0 - e2 * sin * sin).sqrt();
        let t = tan * tan;
        let c = ep2 * cos * cos;
        let a = (lam - self.lon0) * cos;

        let m = A
            * ((1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e2.powi(2) / 32.0 + 45.0 * e2.powi(3) / 1024.0)
                    * (2.0 * phi).sin()
                + (15.0 * e2.powi(2) / 256.0 + 45.0 * e2.powi(3) / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e2.powi(3) / 3072.0) * (6.0 * phi).sin());

        let easting = K0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
            + FALSE_EASTING;

        let mut northing = K0
            * (m + n
                * tan
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

        if !self.north {
            northing += FALSE_NORTHING_SOUTH;
        }

        (easting, northing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian() {
        assert_eq!(Utm::new(45, true).central_meridian(), 87.0);
        assert_eq!(Utm::new(31, true).central_meridian(), 3.0);
        assert_eq!(Utm::new(1, false).central_meridian(), -177.0);
    }

    #[test]
    fn test_origin_maps_to_equator_on_central_meridian() {
        let utm = Utm::new(45, true);
        let (lon, lat) = utm.to_geographic(500_000.0, 0.0);
        assert!((lon - 87.0).abs() < 1e-9, "lon {}", lon);
        assert!(lat.abs() < 1e-9, "lat {}", lat);
    }

    #[test]
    fn test_roundtrip_within_zone() {
        let utm = Utm::new(45, true);
        for &(lon, lat) in &[(85.9, 20.3), (87.0, 45.0), (89.5, 5.0), (84.2, 60.0)] {
            let (e, n) = utm.from_geographic(lon, lat);
            let (lon2, lat2) = utm.to_geographic(e, n);
            assert!((lon - lon2).abs() < 1e-6, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-6, "lat {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_southern_hemisphere_roundtrip() {
        let utm = Utm::new(33, false);
        let (e, n) = utm.from_geographic(15.5, -12.25);
        assert!(n > 8_000_000.0 && n < 10_000_000.0, "northing {}", n);
        let (lon, lat) = utm.to_geographic(e, n);
        assert!((lon - 15.5).abs() < 1e-6);
        assert!((lat + 12.25).abs() < 1e-6);
    }

    #[test]
    fn test_mahanadi_extent_lies_in_odisha() {
        let utm = Utm::new(45, true);
        let (lon, lat) = utm.to_geographic(392635.0, 2248090.0);
        assert!(lon > 85.5 && lon < 86.5, "lon {}", lon);
        assert!(lat > 20.0 && lat < 20.7, "lat {}", lat);
    }
}

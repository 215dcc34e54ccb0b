//! Coordinate Reference System codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CRS codes the viewer understands.
///
/// Simulation outputs are published in WGS84 UTM zones (EPSG:326zz north,
/// EPSG:327zz south). Any other EPSG code is carried through untouched so it
/// can still be requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (lat/lon in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
    /// WGS84 UTM, northern hemisphere
    UtmNorth(u8),
    /// WGS84 UTM, southern hemisphere
    UtmSouth(u8),
    /// Any other EPSG code
    Other(u32),
}

impl CrsCode {
    /// Parse a CRS string as it appears in WMS requests and layer configs.
    ///
    /// Accepts formats like:
    /// - "EPSG:32645"
    /// - "epsg:4326"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "CRS:84" => return Ok(CrsCode::Epsg4326),
            "EPSG:900913" => return Ok(CrsCode::Epsg3857),
            _ => {}
        }

        let code = normalized
            .strip_prefix("EPSG:")
            .ok_or_else(|| CrsParseError::UnsupportedCrs(s.to_string()))?
            .parse::<u32>()
            .map_err(|_| CrsParseError::InvalidCode(s.to_string()))?;

        Ok(Self::from_epsg(code))
    }

    /// Map a numeric EPSG code onto a variant.
    pub fn from_epsg(code: u32) -> Self {
        match code {
            4326 => CrsCode::Epsg4326,
            3857 => CrsCode::Epsg3857,
            32601..=32660 => CrsCode::UtmNorth((code - 32600) as u8),
            32701..=32760 => CrsCode::UtmSouth((code - 32700) as u8),
            other => CrsCode::Other(other),
        }
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3857 => 3857,
            CrsCode::UtmNorth(zone) => 32600 + *zone as u32,
            CrsCode::UtmSouth(zone) => 32700 + *zone as u32,
            CrsCode::Other(code) => *code,
        }
    }

    /// Get the axis order for this CRS in WMS 1.3.0.
    ///
    /// WMS 1.3.0 uses the "natural" axis order of the CRS:
    /// - Geographic CRS: lat, lon (y, x)
    /// - Projected CRS: easting, northing (x, y)
    pub fn axis_order_wms_1_3(&self) -> AxisOrder {
        match self {
            CrsCode::Epsg4326 => AxisOrder::LatLon,
            _ => AxisOrder::XY,
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for CrsCode {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrsCode::from_wms_string(s)
    }
}

impl TryFrom<String> for CrsCode {
    type Error = CrsParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CrsCode::from_wms_string(&s)
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.to_string()
    }
}

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    XY,
    /// Y (latitude/northing), X (longitude/easting)
    LatLon,
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid EPSG code: {0}")]
    InvalidCode(String),
}

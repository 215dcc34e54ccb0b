//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::crs::{AxisOrder, CrsCode};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, UTM zones), coordinates are in meters.
///
/// Serialized as `[min_x, min_y, max_x, max_y]`, the order GeoServer and
/// OpenLayers use for extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Format as a WMS BBOX parameter value in the given axis order.
    pub fn to_wms_string(&self, order: AxisOrder) -> String {
        match order {
            AxisOrder::XY => format!(
                "{},{},{},{}",
                self.min_x, self.min_y, self.max_x, self.max_y
            ),
            AxisOrder::LatLon => format!(
                "{},{},{},{}",
                self.min_y, self.min_x, self.max_y, self.max_x
            ),
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point as (x, y).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when both axes are finite and strictly ordered.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Grow the box by a fraction of its size on every side.
    pub fn padded(&self, fraction: f64) -> BoundingBox {
        let dx = self.width() * fraction;
        let dy = self.height() * fraction;
        BoundingBox::new(
            self.min_x - dx,
            self.min_y - dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        BoundingBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_x, b.min_y, b.max_x, b.max_y]
    }
}

/// A bounding box together with the coordinate reference it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub bbox: BoundingBox,
    pub crs: CrsCode,
}

impl Extent {
    pub fn new(bbox: BoundingBox, crs: CrsCode) -> Self {
        Self { bbox, crs }
    }

    /// WMS 1.3.0 BBOX value, honouring the axis order of the CRS.
    pub fn wms_bbox(&self) -> String {
        self.bbox.to_wms_string(self.crs.axis_order_wms_1_3())
    }
}

//! Coordinate reference system transformations.
//!
//! Implements the handful of map projections the viewer needs from scratch
//! without external dependencies: WGS84 UTM zones, spherical Web Mercator,
//! and extent reprojection between them.

pub mod mercator;
pub mod transform;
pub mod utm;

pub use transform::{fit_extent, from_geographic, to_geographic, transform_extent, ProjectionError};
pub use utm::Utm;

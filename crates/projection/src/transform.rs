//! Extent reprojection between the CRSs the viewer knows about.

use flood_common::{BoundingBox, CrsCode, Extent};

use crate::mercator::{lon_lat_to_mercator, mercator_to_lon_lat};
use crate::utm::Utm;

/// Points sampled along each edge when reprojecting an extent. Edges of a
/// projected box are curved in the target CRS, so corners alone undershoot.
const EDGE_STOPS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("No transformation available for {0}")]
    UnsupportedCrs(CrsCode),

    #[error("Transformation produced a non-finite extent from {0}")]
    NonFinite(CrsCode),
}

/// Convert a point in `crs` to (lon, lat) degrees.
pub fn to_geographic(crs: CrsCode, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
    match crs {
        CrsCode::Epsg4326 => Ok((x, y)),
        CrsCode::Epsg3857 => Ok(mercator_to_lon_lat(x, y)),
        CrsCode::UtmNorth(zone) => Ok(Utm::new(zone, true).to_geographic(x, y)),
        CrsCode::UtmSouth(zone) => Ok(Utm::new(zone, false).to_geographic(x, y)),
        CrsCode::Other(_) => Err(ProjectionError::UnsupportedCrs(crs)),
    }
}

/// Convert (lon, lat) degrees to a point in `crs`.
pub fn from_geographic(crs: CrsCode, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
    match crs {
        CrsCode::Epsg4326 => Ok((lon, lat)),
        CrsCode::Epsg3857 => Ok(lon_lat_to_mercator(lon, lat)),
        CrsCode::UtmNorth(zone) => Ok(Utm::new(zone, true).from_geographic(lon, lat)),
        CrsCode::UtmSouth(zone) => Ok(Utm::new(zone, false).from_geographic(lon, lat)),
        CrsCode::Other(_) => Err(ProjectionError::UnsupportedCrs(crs)),
    }
}

/// Reproject an extent, returning the box enclosing every sampled edge point.
pub fn transform_extent(extent: &Extent, target: CrsCode) -> Result<Extent, ProjectionError> {
    if extent.crs == target {
        return Ok(*extent);
    }

    let b = &extent.bbox;
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for i in 0..=EDGE_STOPS {
        let t = i as f64 / EDGE_STOPS as f64;
        let x = b.min_x + t * b.width();
        let y = b.min_y + t * b.height();

        for (px, py) in [(x, b.min_y), (x, b.max_y), (b.min_x, y), (b.max_x, y)] {
            let (lon, lat) = to_geographic(extent.crs, px, py)?;
            let (tx, ty) = from_geographic(target, lon, lat)?;
            min_x = min_x.min(tx);
            min_y = min_y.min(ty);
            max_x = max_x.max(tx);
            max_y = max_y.max(ty);
        }
    }

    let bbox = BoundingBox::new(min_x, min_y, max_x, max_y);
    if !bbox.is_valid() {
        return Err(ProjectionError::NonFinite(extent.crs));
    }
    Ok(Extent::new(bbox, target))
}

/// Web Mercator view box for an extent, grown by `padding` (fraction of size
/// per side) so the overlay does not touch the viewport edge.
pub fn fit_extent(extent: &Extent, padding: f64) -> Result<Extent, ProjectionError> {
    let projected = transform_extent(extent, CrsCode::Epsg3857)?;
    Ok(Extent::new(projected.bbox.padded(padding), CrsCode::Epsg3857))
}

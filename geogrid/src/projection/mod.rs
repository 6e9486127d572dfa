//! Coordinate projections between geographic and projected planes.

#[cfg(feature = "geodesy")]
mod geodesy;
mod laea;
mod rotation;

#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;
pub use laea::LambertAzimuthalEqualArea;
pub use rotation::Rotation;

use geogrid_types::{Point, PointLonLat, PointXY};

use crate::error::GridError;
use crate::spec::GridSpec;

/// A bidirectional point transform.
///
/// `fwd` maps from the grid's native coordinates towards the projected
/// representation, `inv` maps back. Implementations reject points in the
/// wrong representation with [`GridError::Projection`].
pub trait Projection: std::fmt::Debug + Send + Sync {
    /// Forward transform.
    fn fwd(&self, p: Point) -> Result<Point, GridError>;

    /// Inverse transform.
    fn inv(&self, p: Point) -> Result<Point, GridError>;
}

pub(crate) fn expect_lonlat(p: &Point) -> Result<PointLonLat, GridError> {
    p.as_lonlat()
        .copied()
        .ok_or_else(|| GridError::Projection(format!("expected geographic coordinates, got {p:?}")))
}

pub(crate) fn expect_xy(p: &Point) -> Result<PointXY, GridError> {
    p.as_xy()
        .copied()
        .ok_or_else(|| GridError::Projection(format!("expected plane coordinates, got {p:?}")))
}

/// Identity transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProjection;

impl Projection for NoProjection {
    fn fwd(&self, p: Point) -> Result<Point, GridError> {
        Ok(p)
    }

    fn inv(&self, p: Point) -> Result<Point, GridError> {
        Ok(p)
    }
}

/// Plate carrée: geographic coordinates relabelled as plane coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlateCaree;

impl Projection for PlateCaree {
    fn fwd(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_lonlat(&p)?;
        Ok(Point::xy(q.lon, q.lat))
    }

    fn inv(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_xy(&p)?;
        Ok(Point::lonlat(q.x, q.y))
    }
}

/// Builds a projection from its parametrisation, dispatching on `"type"`.
pub fn projection_from_spec(spec: &GridSpec) -> Result<Box<dyn Projection>, GridError> {
    match spec.require_str("type")? {
        "none" => Ok(Box::new(NoProjection)),
        "plate-caree" | "plate_caree" => Ok(Box::new(PlateCaree)),
        "rotation" => Ok(Box::new(Rotation::from_spec(spec)?)),
        "laea" | "lambert_azimuthal_equal_area" => {
            Ok(Box::new(LambertAzimuthalEqualArea::from_spec(spec)?))
        }
        #[cfg(feature = "geodesy")]
        "proj" => Ok(Box::new(GeodesyProjection::new(spec.require_str("proj")?)?)),
        other => Err(GridError::Projection(format!("unknown projection '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geogrid_types::points_equal;
    use serde_json::json;

    use super::*;

    #[test]
    fn plate_caree_relabels() {
        let p = Point::lonlat(10., 20.);
        let q = PlateCaree.fwd(p).expect("geographic input");
        assert_eq!(q, Point::xy(10., 20.));
        assert!(points_equal(&PlateCaree.inv(q).expect("plane input"), &p, 0.));

        assert_matches!(PlateCaree.fwd(q), Err(GridError::Projection(_)));
    }

    #[test]
    fn unknown_projection_name() {
        let spec = GridSpec::from_value(json!({"type": "mercator"})).expect("object");
        assert_matches!(projection_from_spec(&spec), Err(GridError::Projection(_)));
    }

    #[test]
    fn rotation_from_spec() {
        let spec = GridSpec::from_value(json!({
            "type": "rotation",
            "south_pole_lon": -176.,
            "south_pole_lat": -40.,
        }))
        .expect("object");
        let proj = projection_from_spec(&spec).expect("valid rotation");

        let p = Point::lonlat(12., 55.);
        let q = proj.fwd(p).expect("geographic input");
        let r = proj.inv(q).expect("geographic input");
        assert!(points_equal(&p, &r, 1e-6), "{p:?} -> {q:?} -> {r:?}");
    }
}

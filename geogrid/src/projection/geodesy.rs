//! Projection defined by an external CRS/pipeline definition string.

use geodesy::prelude::*;
use geogrid_types::Point;

use crate::error::GridError;
use crate::projection::{expect_lonlat, expect_xy, Projection};

/// Projection backed by the `geodesy` crate, built from a pipeline
/// definition string (e.g. `"laea lon_0=10 lat_0=52"`).
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
    definition: String,
}

impl GeodesyProjection {
    /// Parses a definition string into an operator.
    pub fn new(definition: &str) -> Result<Self, GridError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|e| GridError::Projection(format!("'{definition}': {e}")))?;
        Ok(Self {
            context,
            op,
            definition: definition.to_string(),
        })
    }

    /// The definition string the operator was built from.
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl std::fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyProjection")
            .field("definition", &self.definition)
            .finish()
    }
}

impl Projection for GeodesyProjection {
    fn fwd(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_lonlat(&p)?;

        let mut data = [Coor2D::geo(q.lat, q.lon)];
        self.context
            .apply(self.op, Fwd, &mut data)
            .map_err(|e| GridError::Projection(format!("'{}': {e}", self.definition)))?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return Err(GridError::Projection(format!(
                "'{}': ({}, {}) cannot be projected",
                self.definition, q.lon, q.lat
            )));
        }

        Ok(Point::xy(data[0].0[0], data[0].0[1]))
    }

    fn inv(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_xy(&p)?;

        let mut data = [Coor2D([q.x, q.y])];
        self.context
            .apply(self.op, Inv, &mut data)
            .map_err(|e| GridError::Projection(format!("'{}': {e}", self.definition)))?;

        Ok(Point::lonlat(
            data[0].0[0].to_degrees(),
            data[0].0[1].to_degrees(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use geogrid_types::points_equal;

    use super::*;

    #[test]
    fn malformed_definitions_are_rejected() {
        assert!(GeodesyProjection::new("not a projection").is_err());
    }

    #[test]
    fn laea_round_trip() {
        let proj = GeodesyProjection::new("laea lon_0=10 lat_0=52").expect("valid definition");

        let p = Point::lonlat(12., 55.);
        let projected = proj.fwd(p).expect("projectable");
        let back = proj.inv(projected).expect("plane input");
        assert!(points_equal(&p, &back, 1e-6), "{p:?} -> {projected:?} -> {back:?}");
    }
}

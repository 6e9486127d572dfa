//! Grids defined by explicit coordinate arrays.

use geogrid_types::{BoundingBox, Point, PointLonLat};

use crate::error::GridError;
use crate::grid::Grid;
use crate::iterator::{GridIterator, UnstructuredIterator};
use crate::spec::GridSpec;

/// Grid given as parallel longitude and latitude arrays, one entry per
/// point, in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct Unstructured {
    lons: Vec<f64>,
    lats: Vec<f64>,
}

impl Unstructured {
    /// Creates a grid from coordinate arrays of equal length; latitudes
    /// must be within range.
    pub fn new(lons: Vec<f64>, lats: Vec<f64>) -> Result<Self, GridError> {
        if lons.len() != lats.len() {
            return Err(GridError::Range(format!(
                "coordinate arrays differ in length: {} != {}",
                lons.len(),
                lats.len()
            )));
        }
        if lats.iter().any(|&lat| !(-90. ..=90.).contains(&lat)) {
            return Err(GridError::Range("latitude out of range".to_string()));
        }
        Ok(Self { lons, lats })
    }

    /// Creates a grid from geographic points.
    pub fn from_points(points: &[PointLonLat]) -> Result<Self, GridError> {
        Self::new(
            points.iter().map(|p| p.lon).collect(),
            points.iter().map(|p| p.lat).collect(),
        )
    }

    /// The longitudes, in scan order.
    pub fn longitudes(&self) -> &[f64] {
        &self.lons
    }

    /// The latitudes, in scan order.
    pub fn latitudes(&self) -> &[f64] {
        &self.lats
    }
}

pub(crate) fn build_unstructured(spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
    let lons = spec
        .get_f64s("longitudes")
        .ok_or_else(|| GridError::Spec("unstructured requires 'longitudes'".to_string()))?;
    let lats = spec
        .get_f64s("latitudes")
        .ok_or_else(|| GridError::Spec("unstructured requires 'latitudes'".to_string()))?;
    Ok(Box::new(Unstructured::new(lons, lats)?))
}

impl Grid for Unstructured {
    fn size(&self) -> usize {
        self.lons.len()
    }

    // nothing is known of the arrangement, so the extent is conservative
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::global()
    }

    fn includes_north_pole(&self) -> bool {
        true
    }

    fn includes_south_pole(&self) -> bool {
        true
    }

    fn is_periodic_west_east(&self) -> bool {
        true
    }

    fn iter(&self) -> GridIterator<'_> {
        GridIterator::Unstructured(UnstructuredIterator::new(&self.lons, &self.lats, None))
    }

    fn first_point(&self) -> Option<Point> {
        (!self.lons.is_empty()).then(|| Point::lonlat(self.lons[0], self.lats[0]))
    }

    fn last_point(&self) -> Option<Point> {
        let n = self.lons.len();
        (n > 0).then(|| Point::lonlat(self.lons[n - 1], self.lats[n - 1]))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geogrid_types::points_equal;
    use serde_json::json;

    use super::*;

    #[test]
    fn preserves_scan_order() {
        let grid =
            Unstructured::new(vec![0., 10., 20.], vec![50., 51., 52.]).expect("equal lengths");
        assert_eq!(grid.size(), 3);

        let points = grid.to_points();
        assert!(points_equal(&points[1], &Point::lonlat(10., 51.), 0.));
        assert!(points_equal(
            &grid.first_point().expect("non-empty"),
            &Point::lonlat(0., 50.),
            0.
        ));
        assert!(points_equal(
            &grid.last_point().expect("non-empty"),
            &Point::lonlat(20., 52.),
            0.
        ));
    }

    #[test]
    fn mismatched_or_invalid_arrays_are_rejected() {
        assert_matches!(
            Unstructured::new(vec![0.], vec![]),
            Err(GridError::Range(_))
        );
        assert_matches!(
            Unstructured::new(vec![0.], vec![91.]),
            Err(GridError::Range(_))
        );
    }

    #[test]
    fn from_points_and_empty() {
        let grid = Unstructured::from_points(&[
            PointLonLat::new(0., 0.),
            PointLonLat::new(90., 45.),
        ])
        .expect("valid points");
        assert_eq!(grid.size(), 2);

        let empty = Unstructured::new(vec![], vec![]).expect("empty arrays");
        assert!(empty.is_empty());
        assert_eq!(empty.first_point(), None);
        assert_eq!(empty.last_point(), None);
    }

    #[test]
    fn builds_from_spec() {
        let spec = GridSpec::from_value(json!({
            "type": "unstructured",
            "longitudes": [0.0, 180.0],
            "latitudes": [10.0, -10.0],
        }))
        .expect("object");
        let grid = build_unstructured(&spec).expect("valid arrays");
        assert_eq!(grid.size(), 2);
    }
}

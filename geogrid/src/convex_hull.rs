//! Convex hull of a planar point set.

use std::collections::HashMap;

use geo::{ConvexHull as _, MultiPoint, Point as PlanarPoint};

use crate::error::GridError;

/// Convex hull of a set of points, keeping indices into the input set.
///
/// Only two-dimensional input is supported; the expected coordinate layout
/// is interleaved, `dimension` values per point.
#[derive(Clone, Debug)]
pub struct ConvexHull {
    vertices: Vec<usize>,
}

impl ConvexHull {
    /// Computes the hull of `coordinates`, interpreted as points of
    /// `dimension` interleaved coordinates each.
    pub fn new(dimension: usize, coordinates: &[f64]) -> Result<Self, GridError> {
        if dimension == 0 {
            return Err(GridError::Search("dimension must be positive".to_string()));
        }
        if coordinates.len() % dimension != 0 {
            return Err(GridError::Search(format!(
                "coordinate count {} is not a multiple of dimension {dimension}",
                coordinates.len()
            )));
        }
        if dimension != 2 {
            return Err(GridError::Search(format!(
                "unsupported dimension {dimension}"
            )));
        }

        let n = coordinates.len() / 2;
        if n < 3 {
            return Err(GridError::Search(format!(
                "hull requires at least 3 points, got {n}"
            )));
        }

        // map hull coordinates back to input indices; duplicate input
        // points resolve to the first occurrence
        let mut index = HashMap::with_capacity(n);
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let (x, y) = (coordinates[2 * i], coordinates[2 * i + 1]);
            index.entry((x.to_bits(), y.to_bits())).or_insert(i);
            points.push(PlanarPoint::new(x, y));
        }

        let hull = MultiPoint::new(points).convex_hull();
        let ring = &hull.exterior().0;
        if ring.len() < 4 {
            return Err(GridError::Search("points are collinear".to_string()));
        }

        // the exterior ring repeats the first coordinate to close
        let vertices = ring[..ring.len() - 1]
            .iter()
            .map(|c| {
                index
                    .get(&(c.x.to_bits(), c.y.to_bits()))
                    .copied()
                    .ok_or_else(|| GridError::Search("hull vertex not in input".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { vertices })
    }

    /// Indices of the hull vertices, in ring order.
    pub fn list_vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Hull edges as index pairs, in ring order.
    pub fn list_facets(&self) -> Vec<[usize; 2]> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| [self.vertices[i], self.vertices[(i + 1) % n]])
            .collect()
    }

    /// Triangulation of the hull interior, as a fan from the first vertex.
    pub fn list_triangles(&self) -> Vec<[usize; 3]> {
        let v = &self.vertices;
        (1..v.len().saturating_sub(1))
            .map(|i| [v[0], v[i], v[i + 1]])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // unit square corners plus an interior point
    const SQUARE: [f64; 10] = [0., 0., 1., 0., 1., 1., 0., 1., 0.5, 0.5];

    #[test]
    fn interior_points_are_not_vertices() {
        let hull = ConvexHull::new(2, &SQUARE).expect("non-degenerate");

        let mut vertices = hull.list_vertices().to_vec();
        vertices.sort_unstable();
        assert_eq!(vertices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn facets_close_the_ring() {
        let hull = ConvexHull::new(2, &SQUARE).expect("non-degenerate");
        let facets = hull.list_facets();
        assert_eq!(facets.len(), 4);

        // each vertex appears once as a start and once as an end
        for &v in hull.list_vertices() {
            assert_eq!(facets.iter().filter(|f| f[0] == v).count(), 1);
            assert_eq!(facets.iter().filter(|f| f[1] == v).count(), 1);
        }
    }

    #[test]
    fn triangles_fan_the_hull() {
        let hull = ConvexHull::new(2, &SQUARE).expect("non-degenerate");
        assert_eq!(hull.list_triangles().len(), 2);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert_matches!(ConvexHull::new(0, &SQUARE), Err(GridError::Search(_)));
        assert_matches!(ConvexHull::new(2, &SQUARE[..3]), Err(GridError::Search(_)));
        assert_matches!(ConvexHull::new(3, &SQUARE[..9]), Err(GridError::Search(_)));
        assert_matches!(ConvexHull::new(2, &[0., 0., 1., 1.]), Err(GridError::Search(_)));
        assert_matches!(
            ConvexHull::new(2, &[0., 0., 1., 1., 2., 2.]),
            Err(GridError::Search(_))
        );
    }
}

//! Closed geographic polygon optimised for repeated containment queries.

use crate::error::GeoError;
use crate::lonlat::PointLonLat;

const EPS: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

fn approx_ge(a: f64, b: f64) -> bool {
    a >= b || approx_eq(a, b)
}

fn cross_product_analog(a: &PointLonLat, b: &PointLonLat, c: &PointLonLat) -> f64 {
    (a.lon - c.lon) * (b.lat - c.lat) - (a.lat - c.lat) * (b.lon - c.lon)
}

fn on_direction(a: f64, b: f64, c: f64) -> i32 {
    if a <= b && b <= c {
        1
    } else if c <= b && b <= a {
        -1
    } else {
        0
    }
}

fn on_side(p: &PointLonLat, a: &PointLonLat, b: &PointLonLat) -> i32 {
    let v = cross_product_analog(p, a, b);
    if approx_eq(v, 0.) {
        0
    } else if v > 0. {
        1
    } else {
        -1
    }
}

/// Closed polygon over geographic coordinates.
///
/// Construction merges colinear edges and caches the coordinate extrema, so
/// that [`contains`](LonLatPolygon::contains) can short-circuit on the
/// bounding box and handle poles and longitude periodicity cheaply.
#[derive(Debug, Clone)]
pub struct LonLatPolygon {
    points: Vec<PointLonLat>,
    min: PointLonLat,
    max: PointLonLat,
    include_north_pole: bool,
    include_south_pole: bool,
    quick_check_longitude: bool,
}

impl LonLatPolygon {
    /// Creates a polygon from a closed vertex list (first vertex repeated
    /// last). When `include_poles` is set and a vertex touches a pole, the
    /// whole pole is considered inside.
    pub fn new(points: &[PointLonLat], include_poles: bool) -> Result<Self, GeoError> {
        if points.len() < 2 {
            return Err(GeoError::Area(format!(
                "polygon requires at least 2 points, got {}",
                points.len()
            )));
        }

        let (first, last) = (points[0], points[points.len() - 1]);
        if !approx_eq(first.lon, last.lon) || !approx_eq(first.lat, last.lat) {
            return Err(GeoError::Area(
                "polygon is not closed (first and last points differ)".to_string(),
            ));
        }

        let mut merged = Vec::with_capacity(points.len());
        merged.push(points[0]);
        if points.len() > 2 {
            merged.push(points[1]);

            for &a in &points[2..] {
                // a point aligned with the previous edge extends that edge
                let n = merged.len();
                let b = merged[n - 1];
                let c = merged[n - 2];
                if approx_eq(0., cross_product_analog(&a, &b, &c)) {
                    merged[n - 1] = a;
                    continue;
                }

                merged.push(a);
            }
        } else {
            merged.push(points[1]);
        }

        let mut min = merged[0];
        let mut max = min;
        for p in &merged {
            min = PointLonLat::new(min.lon.min(p.lon), min.lat.min(p.lat));
            max = PointLonLat::new(max.lon.max(p.lon), max.lat.max(p.lat));
        }

        if !approx_ge(min.lat, -90.) || !approx_ge(90., max.lat) {
            return Err(GeoError::Range(format!(
                "polygon latitudes outside [-90, 90]: [{}, {}]",
                min.lat, max.lat
            )));
        }

        Ok(Self {
            include_north_pole: include_poles && approx_eq(max.lat, 90.),
            include_south_pole: include_poles && approx_eq(min.lat, -90.),
            quick_check_longitude: approx_ge(360., max.lon - min.lon),
            points: merged,
            min,
            max,
        })
    }

    /// Number of stored vertices, closing vertex included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no vertices are stored (never true for a constructed value).
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Componentwise minima of the vertices.
    pub fn min(&self) -> PointLonLat {
        self.min
    }

    /// Componentwise maxima of the vertices.
    pub fn max(&self) -> PointLonLat {
        self.max
    }

    /// Winding-number containment test.
    ///
    /// With `normalise_angle`, the point's longitude is first folded into
    /// the polygon's frame; otherwise the latitude is validated and the
    /// coordinates are used as given.
    pub fn contains(&self, p: &PointLonLat, normalise_angle: bool) -> Result<bool, GeoError> {
        if !normalise_angle && !(-90. ..=90.).contains(&p.lat) {
            return Err(GeoError::Range(format!("invalid latitude {}", p.lat)));
        }

        let mut q = PointLonLat::new(
            PointLonLat::normalise_angle_to_minimum(p.lon, self.min.lon),
            p.lat,
        );

        // poles
        if self.include_north_pole && approx_eq(q.lat, 90.) {
            return Ok(true);
        }
        if self.include_south_pole && approx_eq(q.lat, -90.) {
            return Ok(true);
        }

        // bounding box
        if !approx_ge(q.lat, self.min.lat) || !approx_ge(self.max.lat, q.lat) {
            return Ok(false);
        }
        if self.quick_check_longitude
            && (!approx_ge(q.lon, self.min.lon) || !approx_ge(self.max.lon, q.lon))
        {
            return Ok(false);
        }

        loop {
            let mut wn = 0;
            let mut prev = 0;

            // testing if Q is on|above|below (in latitude) an A,B edge, by
            // intersecting "up" on forward crossings and "down" on backward
            // crossings
            for w in self.points.windows(2) {
                let (a, b) = (&w[0], &w[1]);

                let direction = on_direction(a.lat, q.lat, b.lat);
                if direction != 0 {
                    let side = on_side(&q, a, b);
                    if side == 0 && on_direction(a.lon, q.lon, b.lon) != 0 {
                        return Ok(true);
                    }
                    if (prev != 1 && direction > 0 && side > 0)
                        || (prev != -1 && direction < 0 && side < 0)
                    {
                        prev = direction;
                        wn += direction;
                    }
                }
            }

            // wn == 0 only when Q is outside
            if wn != 0 {
                return Ok(true);
            }

            q = PointLonLat::new(q.lon + 360., q.lat);
            if q.lon > self.max.lon {
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_square() -> Vec<PointLonLat> {
        vec![
            PointLonLat::new(0., 0.),
            PointLonLat::new(10., 0.),
            PointLonLat::new(10., 10.),
            PointLonLat::new(0., 10.),
            PointLonLat::new(0., 0.),
        ]
    }

    #[test]
    fn construction_requires_a_closed_list() {
        assert!(LonLatPolygon::new(&closed_square(), false).is_ok());

        let open = &closed_square()[..4];
        assert!(LonLatPolygon::new(open, false).is_err());
        assert!(LonLatPolygon::new(&closed_square()[..1], false).is_err());
    }

    #[test]
    fn colinear_vertices_are_merged() {
        let with_midpoints = vec![
            PointLonLat::new(0., 0.),
            PointLonLat::new(5., 0.),
            PointLonLat::new(10., 0.),
            PointLonLat::new(10., 10.),
            PointLonLat::new(0., 10.),
            PointLonLat::new(0., 0.),
        ];
        let p = LonLatPolygon::new(&with_midpoints, false).expect("closed polygon");
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn containment_with_normalisation() {
        let p = LonLatPolygon::new(&closed_square(), false).expect("closed polygon");
        assert!(p.contains(&PointLonLat::new(5., 5.), false).expect("valid"));
        assert!(p.contains(&PointLonLat::new(365., 5.), true).expect("valid"));
        assert!(p.contains(&PointLonLat::new(-355., 5.), true).expect("valid"));
        assert!(!p.contains(&PointLonLat::new(15., 5.), false).expect("valid"));
        assert!(!p.contains(&PointLonLat::new(5., 15.), false).expect("valid"));

        assert!(p.contains(&PointLonLat::new(5., 95.), false).is_err());
    }

    #[test]
    fn pole_inclusion() {
        let cap = vec![
            PointLonLat::new(0., 80.),
            PointLonLat::new(90., 80.),
            PointLonLat::new(180., 80.),
            PointLonLat::new(270., 80.),
            PointLonLat::new(0., 90.),
            PointLonLat::new(0., 80.),
        ];

        let with_poles = LonLatPolygon::new(&cap, true).expect("closed polygon");
        assert!(with_poles
            .contains(&PointLonLat::new(123., 90.), false)
            .expect("valid"));

        let without_poles = LonLatPolygon::new(&cap, false).expect("closed polygon");
        assert!(!without_poles.include_north_pole);
    }

    #[test]
    fn bounding_box_quick_rejection() {
        let p = LonLatPolygon::new(&closed_square(), false).expect("closed polygon");
        assert!(p.quick_check_longitude);
        assert!(!p.contains(&PointLonLat::new(5., -5.), false).expect("valid"));
        assert!(!p.contains(&PointLonLat::new(5., 50.), true).expect("valid"));
    }
}

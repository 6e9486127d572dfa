//! General polygon over geographic coordinates, with winding-number
//! containment, Sutherland-Hodgman clipping and shoelace area.

use crate::error::GeoError;
use crate::lonlat::PointLonLat;

type Edge = (PointLonLat, PointLonLat);

fn is_zero(v: f64) -> bool {
    v.abs() <= PointLonLat::EPS
}

fn cross_product_analog(a: &PointLonLat, b: &PointLonLat, c: &PointLonLat) -> f64 {
    (a.lon - c.lon) * (b.lat - c.lat) - (a.lat - c.lat) * (b.lon - c.lon)
}

fn cross(p: &PointLonLat, q: &PointLonLat) -> f64 {
    p.lon * q.lat - p.lat * q.lon
}

fn sub(a: &PointLonLat, b: &PointLonLat) -> PointLonLat {
    PointLonLat::new(a.lon - b.lon, a.lat - b.lat)
}

/// Direction of `b` within the closed interval spanned by `a` and `c`:
/// 1 for increasing, -1 for decreasing, 0 when outside.
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
    if is_zero(v) {
        0
    } else if v > 0. {
        1
    } else {
        -1
    }
}

fn points_equal(a: &PointLonLat, b: &PointLonLat) -> bool {
    a.is_approximately_equal(b, PointLonLat::EPS)
}

/// Open list of vertices; edges wrap around, so the closing vertex is
/// implicit.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    points: Vec<PointLonLat>,
}

impl Polygon {
    /// Creates a polygon from its vertices, in order.
    pub fn new(points: Vec<PointLonLat>) -> Self {
        Self { points }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The vertices.
    pub fn points(&self) -> &[PointLonLat] {
        &self.points
    }

    /// The `i`-th edge, index taken modulo the vertex count.
    fn edge(&self, i: isize) -> Edge {
        let n = self.points.len() as isize;
        let a = i.rem_euclid(n);
        let b = (a + 1) % n;
        (self.points[a as usize], self.points[b as usize])
    }

    /// Appends a vertex unless it duplicates the current first or last one.
    fn push_point(&mut self, p: PointLonLat) {
        let keep = match self.points.last() {
            None => true,
            Some(last) => !points_equal(&p, last) && !points_equal(&p, &self.points[0]),
        };
        if keep {
            self.points.push(p);
        }
    }

    /// Appends the intersection of two edges, if they are not parallel.
    fn push_intersection(&mut self, e: &Edge, f: &Edge) {
        let a = sub(&e.1, &e.0);
        let b = sub(&f.1, &f.0);

        let d = cross(&a, &b);
        if !is_zero(d) {
            let c = sub(&e.0, &f.0);
            let t = cross(&b, &c) / d;
            self.push_point(PointLonLat::new(e.0.lon + a.lon * t, e.0.lat + a.lat * t));
        }
    }

    /// Winding-number point-in-polygon test.
    ///
    /// The point's longitude is folded to the polygon's western edge and the
    /// test is repeated at `+360` steps, so polygons expressed over any
    /// longitude frame are handled.
    pub fn contains(&self, p: &PointLonLat) -> Result<bool, GeoError> {
        if !(-90. ..=90.).contains(&p.lat) {
            return Err(GeoError::Range(format!("invalid latitude {}", p.lat)));
        }
        if self.points.is_empty() {
            return Ok(false);
        }

        let mut min_lon = self.points[0].lon;
        let mut max_lon = min_lon;
        for q in &self.points {
            min_lon = min_lon.min(q.lon);
            max_lon = max_lon.max(q.lon);
        }

        let mut q = PointLonLat::make(p.lon, p.lat, min_lon);

        loop {
            let mut wn = 0;
            let mut prev = 0;

            // testing if Q is on|above|below (in latitude) an A,B edge, by
            // intersecting "up" on forward crossings and "down" on backward
            // crossings
            for i in 0..self.points.len() as isize {
                let (a, b) = self.edge(i);
                let dir = on_direction(a.lat, q.lat, b.lat);
                if dir != 0 {
                    let side = on_side(&q, &a, &b);

                    if side == 0 && on_direction(a.lon, q.lon, b.lon) != 0 {
                        return Ok(true);
                    }

                    if (prev != 1 && dir > 0 && side > 0) || (prev != -1 && dir < 0 && side < 0) {
                        prev = dir;
                        wn += dir;
                    }
                }
            }

            // wn == 0 only when Q is outside
            if wn != 0 {
                return Ok(true);
            }

            q = PointLonLat::new(q.lon + 360., q.lat);
            if q.lon > max_lon {
                return Ok(false);
            }
        }
    }

    /// Area-weighted centroid.
    pub fn centroid(&self) -> PointLonLat {
        let mut a = 0.;
        let mut c = PointLonLat::new(0., 0.);
        for i in 0..self.points.len() as isize {
            let (p, q) = self.edge(i);
            let ai = cross(&p, &q);

            c = PointLonLat::new(c.lon + (p.lon + q.lon) * ai, c.lat + (p.lat + q.lat) * ai);
            a += ai;
        }

        if is_zero(a) {
            c
        } else {
            let f = 1. / (3. * a);
            PointLonLat::new(c.lon * f, c.lat * f)
        }
    }

    /// Clips this polygon against a convex `clipper` (Sutherland-Hodgman).
    pub fn clip(&mut self, clipper: &Polygon) {
        if self.is_empty() || clipper.is_empty() {
            self.points.clear();
            return;
        }

        fn is_point_left_of_edge(e: &Edge, p: &PointLonLat) -> bool {
            let r = cross(&sub(&e.1, &e.0), &sub(p, &e.0));
            r >= 0. || is_zero(r)
        }

        for i in 0..clipper.points.len() as isize {
            let c = clipper.edge(i);

            let poly = Polygon::new(std::mem::take(&mut self.points));

            for j in 0..poly.points.len() as isize {
                let p = poly.edge(j);

                if is_point_left_of_edge(&c, &p.1) {
                    if !is_point_left_of_edge(&c, &p.0) {
                        self.push_intersection(&c, &p);
                    }
                    self.push_point(p.1);
                } else if is_point_left_of_edge(&c, &p.0) {
                    self.push_intersection(&c, &p);
                }
            }
        }

        self.simplify();
    }

    /// Removes duplicate and colinear consecutive vertices; polygons left
    /// with fewer than three vertices are cleared.
    pub fn simplify(&mut self) {
        self.points.dedup_by(|p, q| points_equal(p, q));
        if let [first, .., last] = self.points.as_slice() {
            if points_equal(first, last) {
                self.points.pop();
            }
        }

        let poly = Polygon::new(std::mem::take(&mut self.points));
        self.points.reserve(poly.points.len());

        for i in 0..poly.points.len() as isize {
            let e = poly.edge(i);
            let f = poly.edge(i + 1);
            if !is_zero(cross(&sub(&e.1, &e.0), &sub(&f.1, &e.1))) {
                self.push_point(e.1);
            }
        }

        if self.points.len() < 3 {
            self.points.clear();
        }
    }

    /// Shoelace area; signed (positive counter-clockwise) when `sign` is set.
    pub fn area(&self, sign: bool) -> f64 {
        let mut a = 0.;
        if self.points.len() >= 3 {
            for i in 0..self.points.len() as isize {
                let (p, q) = self.edge(i);
                a += cross(&p, &q);
            }
        }

        (if sign { a } else { a.abs() }) / 2.
    }
}

/// Equality up to a rotation of the vertex list.
impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.is_empty() {
            return true;
        }

        fn min_index(points: &[PointLonLat]) -> usize {
            points
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.lon.total_cmp(&b.lon).then(a.lat.total_cmp(&b.lat)))
                .map(|(i, _)| i)
                .unwrap_or(0)
        }

        let i = min_index(&self.points);
        let j = min_index(&other.points);
        let n = self.len();

        (0..n).all(|k| points_equal(&self.points[(i + k) % n], &other.points[(j + k) % n]))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            PointLonLat::new(0., 0.),
            PointLonLat::new(10., 0.),
            PointLonLat::new(10., 10.),
            PointLonLat::new(0., 10.),
        ])
    }

    #[test]
    fn area_of_a_square() {
        assert_eq!(square().area(false), 100.);
        assert_eq!(square().area(true), 100.);

        let clockwise = Polygon::new(square().points().iter().rev().copied().collect());
        assert_eq!(clockwise.area(true), -100.);
        assert_eq!(clockwise.area(false), 100.);
    }

    #[test]
    fn containment() {
        let p = square();
        assert!(p.contains(&PointLonLat::new(5., 5.)).expect("valid latitude"));
        assert!(p.contains(&PointLonLat::new(0., 0.)).expect("valid latitude"));
        assert!(p.contains(&PointLonLat::new(10., 5.)).expect("valid latitude"));
        assert!(!p.contains(&PointLonLat::new(15., 5.)).expect("valid latitude"));
        assert!(!p.contains(&PointLonLat::new(20., 20.)).expect("valid latitude"));
        assert!(!p.contains(&PointLonLat::new(5., -5.)).expect("valid latitude"));
        assert!(p.contains(&PointLonLat::new(365., 5.)).expect("valid latitude"));

        assert!(p.contains(&PointLonLat::new(5., 95.)).is_err());
    }

    #[test]
    fn containment_across_the_date_line() {
        let p = Polygon::new(vec![
            PointLonLat::new(170., -10.),
            PointLonLat::new(190., -10.),
            PointLonLat::new(190., 10.),
            PointLonLat::new(170., 10.),
        ]);
        assert!(p.contains(&PointLonLat::new(180., 0.)).expect("valid latitude"));
        assert!(p.contains(&PointLonLat::new(-175., 0.)).expect("valid latitude"));
        assert!(!p.contains(&PointLonLat::new(0., 0.)).expect("valid latitude"));
    }

    #[test]
    fn centroid_of_a_square() {
        let c = square().centroid();
        assert_abs_diff_eq!(c.lon, 5., epsilon = 1e-12);
        assert_abs_diff_eq!(c.lat, 5., epsilon = 1e-12);
    }

    #[test]
    fn clip_against_an_overlapping_square() {
        let mut p = square();
        let clipper = Polygon::new(vec![
            PointLonLat::new(5., 5.),
            PointLonLat::new(15., 5.),
            PointLonLat::new(15., 15.),
            PointLonLat::new(5., 15.),
        ]);
        p.clip(&clipper);

        assert_abs_diff_eq!(p.area(false), 25., epsilon = 1e-12);
        assert!(p.contains(&PointLonLat::new(7., 7.)).expect("valid latitude"));
        assert!(!p.contains(&PointLonLat::new(3., 3.)).expect("valid latitude"));
    }

    #[test]
    fn clip_by_an_empty_polygon_clears() {
        let mut p = square();
        p.clip(&Polygon::default());
        assert!(p.is_empty());
    }

    #[test]
    fn simplify_removes_duplicates_and_colinear_points() {
        let mut p = Polygon::new(vec![
            PointLonLat::new(0., 0.),
            PointLonLat::new(5., 0.),
            PointLonLat::new(5., 0.),
            PointLonLat::new(10., 0.),
            PointLonLat::new(10., 10.),
            PointLonLat::new(0., 10.),
            PointLonLat::new(0., 0.),
        ]);
        p.simplify();
        assert_eq!(p.len(), 4);
        assert_eq!(p, square());
    }

    #[test]
    fn degenerate_polygons_simplify_to_nothing() {
        let mut line = Polygon::new(vec![
            PointLonLat::new(0., 0.),
            PointLonLat::new(5., 5.),
            PointLonLat::new(10., 10.),
        ]);
        line.simplify();
        assert!(line.is_empty());
    }

    #[test]
    fn equality_is_rotation_insensitive() {
        let rotated = Polygon::new(vec![
            PointLonLat::new(10., 10.),
            PointLonLat::new(0., 10.),
            PointLonLat::new(0., 0.),
            PointLonLat::new(10., 0.),
        ]);
        assert_eq!(square(), rotated);

        let reversed = Polygon::new(square().points().iter().rev().copied().collect());
        assert_ne!(square(), reversed);
    }
}

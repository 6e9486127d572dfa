//! Cursors over grid points, in scan order.
//!
//! Iterators borrow their grid, so a grid cannot be dropped or mutated while
//! a cursor over it is alive. When the grid carries a projection, points are
//! transformed on yield.

use std::borrow::Cow;

use geogrid_types::Point;

use crate::projection::Projection;

/// Row-oriented access for grids whose rows share one latitude.
pub(crate) trait Rows {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Latitude of row `j`.
    fn row_latitude(&self, j: usize) -> f64;

    /// Longitudes of row `j`, west to east.
    fn row_longitudes(&self, j: usize) -> Vec<f64>;

    /// Flat index of the first point of row `j`; `row_start(rows())` is the
    /// total size.
    fn row_start(&self, j: usize) -> usize;
}

fn project(projection: Option<&dyn Projection>, p: Point) -> Point {
    match projection {
        Some(proj) => match proj.fwd(p) {
            Ok(q) => q,
            // grids check the projection over every point before attaching
            // it, so a rejection here is a logic error
            Err(err) => panic!("projection rejected grid point {p:?}: {err}"),
        },
        None => p,
    }
}

/// Cursor over the cartesian product of longitudes and latitudes, scanning
/// west to east within each row, north to south across rows.
pub struct RegularIterator<'a> {
    lons: &'a [f64],
    lats: &'a [f64],
    projection: Option<&'a dyn Projection>,
    index: usize,
}

impl<'a> RegularIterator<'a> {
    pub(crate) fn new(
        lons: &'a [f64],
        lats: &'a [f64],
        projection: Option<&'a dyn Projection>,
    ) -> Self {
        Self {
            lons,
            lats,
            projection,
            index: 0,
        }
    }

    fn size(&self) -> usize {
        self.lons.len() * self.lats.len()
    }

    /// Current flat index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Positions the cursor; out-of-range indices exhaust it and return
    /// `false`.
    pub fn seek(&mut self, index: usize) -> bool {
        self.index = index.min(self.size());
        self.index < self.size()
    }
}

impl Iterator for RegularIterator<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.index >= self.size() {
            return None;
        }

        let i = self.index % self.lons.len();
        let j = self.index / self.lons.len();
        self.index += 1;

        Some(project(
            self.projection,
            Point::lonlat(self.lons[i], self.lats[j]),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.size() - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RegularIterator<'_> {}

/// Cursor over a grid with per-row point counts. The current row's
/// longitudes are cached and refreshed only when the cursor crosses a row
/// boundary.
pub struct ReducedIterator<'a> {
    grid: &'a dyn Rows,
    projection: Option<&'a dyn Projection>,
    index: usize,
    j: usize,
    lons: Vec<f64>,
}

impl<'a> ReducedIterator<'a> {
    pub(crate) fn new(grid: &'a dyn Rows, projection: Option<&'a dyn Projection>) -> Self {
        let lons = if grid.rows() > 0 {
            grid.row_longitudes(0)
        } else {
            Vec::new()
        };
        Self {
            grid,
            projection,
            index: 0,
            j: 0,
            lons,
        }
    }

    fn size(&self) -> usize {
        self.grid.row_start(self.grid.rows())
    }

    /// Current flat index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Positions the cursor, relocating the row by binary search over the
    /// row offsets; out-of-range indices exhaust it and return `false`.
    pub fn seek(&mut self, index: usize) -> bool {
        let size = self.size();
        if index >= size {
            self.index = size;
            return false;
        }

        self.index = index;

        let mut lo = 0;
        let mut hi = self.grid.rows();
        while lo + 1 < hi {
            let mid = (lo + hi) / 2;
            if self.grid.row_start(mid) <= index {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        if lo != self.j || self.lons.is_empty() {
            self.j = lo;
            self.lons = self.grid.row_longitudes(lo);
        }
        true
    }
}

impl Iterator for ReducedIterator<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.index >= self.size() {
            return None;
        }

        while self.index >= self.grid.row_start(self.j + 1) {
            self.j += 1;
            self.lons = self.grid.row_longitudes(self.j);
        }

        let i = self.index - self.grid.row_start(self.j);
        self.index += 1;

        Some(project(
            self.projection,
            Point::lonlat(self.lons[i], self.grid.row_latitude(self.j)),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.size() - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ReducedIterator<'_> {}

/// Cursor over explicit coordinate arrays.
pub struct UnstructuredIterator<'a> {
    lons: Cow<'a, [f64]>,
    lats: Cow<'a, [f64]>,
    projection: Option<&'a dyn Projection>,
    index: usize,
}

impl<'a> UnstructuredIterator<'a> {
    pub(crate) fn new(
        lons: &'a [f64],
        lats: &'a [f64],
        projection: Option<&'a dyn Projection>,
    ) -> Self {
        debug_assert_eq!(lons.len(), lats.len());
        Self {
            lons: Cow::Borrowed(lons),
            lats: Cow::Borrowed(lats),
            projection,
            index: 0,
        }
    }

    pub(crate) fn owned(lons: Vec<f64>, lats: Vec<f64>) -> Self {
        debug_assert_eq!(lons.len(), lats.len());
        Self {
            lons: Cow::Owned(lons),
            lats: Cow::Owned(lats),
            projection: None,
            index: 0,
        }
    }

    /// Current flat index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Positions the cursor; out-of-range indices exhaust it and return
    /// `false`.
    pub fn seek(&mut self, index: usize) -> bool {
        self.index = index.min(self.lons.len());
        self.index < self.lons.len()
    }
}

impl Iterator for UnstructuredIterator<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.index >= self.lons.len() {
            return None;
        }

        let i = self.index;
        self.index += 1;

        Some(project(
            self.projection,
            Point::lonlat(self.lons[i], self.lats[i]),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.lons.len() - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for UnstructuredIterator<'_> {}

/// Cursor over any grid's points.
pub enum GridIterator<'a> {
    /// Cartesian-product grids.
    Regular(RegularIterator<'a>),
    /// Grids with per-row point counts.
    Reduced(ReducedIterator<'a>),
    /// Grids with explicit coordinate arrays.
    Unstructured(UnstructuredIterator<'a>),
}

impl GridIterator<'_> {
    /// Current flat index.
    pub fn index(&self) -> usize {
        match self {
            Self::Regular(it) => it.index(),
            Self::Reduced(it) => it.index(),
            Self::Unstructured(it) => it.index(),
        }
    }

    /// Positions the cursor; out-of-range indices exhaust it and return
    /// `false`.
    pub fn seek(&mut self, index: usize) -> bool {
        match self {
            Self::Regular(it) => it.seek(index),
            Self::Reduced(it) => it.seek(index),
            Self::Unstructured(it) => it.seek(index),
        }
    }
}

impl Iterator for GridIterator<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        match self {
            Self::Regular(it) => it.next(),
            Self::Reduced(it) => it.next(),
            Self::Unstructured(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Regular(it) => it.size_hint(),
            Self::Reduced(it) => it.size_hint(),
            Self::Unstructured(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for GridIterator<'_> {}

#[cfg(test)]
mod tests {
    use geogrid_types::points_equal;

    use super::*;

    #[test]
    fn regular_scan_order() {
        let lons = [0., 90., 180., 270.];
        let lats = [45., -45.];
        let mut it = RegularIterator::new(&lons, &lats, None);

        assert!(points_equal(&it.next().expect("4x2 points"), &Point::lonlat(0., 45.), 0.));
        assert!(points_equal(&it.next().expect("4x2 points"), &Point::lonlat(90., 45.), 0.));

        // rows wrap west before stepping south
        assert!(it.seek(4));
        assert!(points_equal(&it.next().expect("4x2 points"), &Point::lonlat(0., -45.), 0.));

        assert_eq!(it.len(), 3);
        assert_eq!(it.count(), 3);
    }

    #[test]
    fn seek_past_the_end_exhausts() {
        let lons = [0., 180.];
        let lats = [0.];
        let mut it = RegularIterator::new(&lons, &lats, None);
        assert!(!it.seek(2));
        assert_eq!(it.next(), None);
        assert_eq!(it.index(), 2);
    }

    #[test]
    fn unstructured_yields_pairs() {
        let lons = [10., 20., 30.];
        let lats = [1., 2., 3.];
        let it = UnstructuredIterator::new(&lons, &lats, None);
        let points: Vec<_> = it.collect();
        assert_eq!(points.len(), 3);
        assert!(points_equal(&points[2], &Point::lonlat(30., 3.), 0.));
    }
}

//! Reduced Gaussian grids: one row per Gaussian latitude, with per-row
//! point counts.

use std::sync::OnceLock;

use geogrid_types::BoundingBox;

use crate::error::GridError;
use crate::grid::Grid;
use crate::iterator::{GridIterator, ReducedIterator, Rows};
use crate::projection::Projection;
use crate::range::{GaussianRange, RegularRange};
use crate::spec::GridSpec;

/// Reduced Gaussian grid: `2N` rows at the Gaussian latitudes of order `N`,
/// row `j` holding `pl[j]` equally spaced longitudes starting at Greenwich.
#[derive(Debug)]
pub struct ReducedGaussian {
    n: usize,
    pl: Vec<usize>,
    lat: GaussianRange,
    niacc: OnceLock<Vec<usize>>,
    projection: Option<Box<dyn Projection>>,
}

impl ReducedGaussian {
    /// Creates the octahedral grid `O<N>`: `pl[j] = 20 + 4·min(j, 2N-1-j)`.
    pub fn octahedral(n: usize) -> Result<Self, GridError> {
        if n == 0 {
            return Err(GridError::Range("Gaussian order must be positive".to_string()));
        }
        let pl = (0..2 * n).map(|j| 20 + 4 * j.min(2 * n - 1 - j)).collect();
        Self::from_pl(pl)
    }

    /// Creates a grid from explicit row lengths; one per Gaussian latitude,
    /// so the length must be even and every row non-empty.
    pub fn from_pl(pl: Vec<usize>) -> Result<Self, GridError> {
        if pl.is_empty() || pl.len() % 2 != 0 {
            return Err(GridError::Range(format!(
                "pl length must be even and positive, got {}",
                pl.len()
            )));
        }
        if pl.iter().any(|&ni| ni == 0) {
            return Err(GridError::Range("empty row in pl".to_string()));
        }

        let n = pl.len() / 2;
        Ok(Self {
            n,
            pl,
            lat: GaussianRange::new(n)?,
            niacc: OnceLock::new(),
            projection: None,
        })
    }

    /// Attaches a projection, applied on iteration; fails if the projection
    /// rejects any grid point.
    pub fn with_projection(mut self, projection: Box<dyn Projection>) -> Result<Self, GridError> {
        super::validate_projection(&self, projection.as_ref())?;
        self.projection = Some(projection);
        Ok(self)
    }

    /// The Gaussian order `N`.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Row lengths, north to south.
    pub fn pl(&self) -> &[usize] {
        &self.pl
    }

    /// Number of rows.
    pub fn nj(&self) -> usize {
        self.pl.len()
    }

    /// Length of row `j`.
    pub fn ni(&self, j: usize) -> usize {
        self.pl[j]
    }

    /// Row of the point at `index`, by binary search over the row offsets.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        if index >= self.size() {
            return None;
        }
        Some(self.niacc().partition_point(|&start| start <= index) - 1)
    }

    fn niacc(&self) -> &[usize] {
        self.niacc.get_or_init(|| {
            let mut acc = Vec::with_capacity(self.pl.len() + 1);
            acc.push(0);
            let mut total = 0;
            for &ni in &self.pl {
                total += ni;
                acc.push(total);
            }
            acc
        })
    }
}

pub(crate) fn build_reduced_gg(spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
    if let Some(pl) = spec.get_i64s("pl") {
        let pl = pl
            .into_iter()
            .map(|ni| {
                usize::try_from(ni).map_err(|_| GridError::Range(format!("invalid row length {ni}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Box::new(ReducedGaussian::from_pl(pl)?));
    }

    let n = spec.require_u64("N")? as usize;
    if spec.get_bool("octahedral").unwrap_or(false) {
        Ok(Box::new(ReducedGaussian::octahedral(n)?))
    } else {
        Err(GridError::Spec(
            "reduced_gg requires 'pl' or 'octahedral: true'".to_string(),
        ))
    }
}

impl Rows for ReducedGaussian {
    fn rows(&self) -> usize {
        self.pl.len()
    }

    fn row_latitude(&self, j: usize) -> f64 {
        self.lat.values()[j]
    }

    fn row_longitudes(&self, j: usize) -> Vec<f64> {
        // unwrap-free: pl rows are validated non-empty at construction
        match RegularRange::periodic(self.pl[j], 0.) {
            Ok(range) => range.values().to_vec(),
            Err(_) => Vec::new(),
        }
    }

    fn row_start(&self, j: usize) -> usize {
        self.niacc()[j]
    }
}

impl Grid for ReducedGaussian {
    fn size(&self) -> usize {
        self.niacc().last().copied().unwrap_or(0)
    }

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
        GridIterator::Reduced(ReducedIterator::new(self, self.projection.as_deref()))
    }

    fn projection(&self) -> Option<&dyn Projection> {
        self.projection.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use geogrid_types::{points_equal, Point};

    use super::*;

    #[test]
    fn octahedral_row_lengths() {
        let grid = ReducedGaussian::octahedral(16).expect("positive order");
        assert_eq!(grid.nj(), 32);
        assert_eq!(grid.pl()[0], 20);
        assert_eq!(grid.pl()[15], 16 + 4 * 16);
        assert_eq!(grid.pl()[16], 16 + 4 * 16);
        assert_eq!(grid.pl()[31], 20);

        // sizes must agree between the rows and the accumulated offsets
        assert_eq!(grid.size(), grid.pl().iter().sum::<usize>());
    }

    #[test]
    fn row_lookup() {
        let grid = ReducedGaussian::from_pl(vec![2, 3, 3, 2]).expect("even pl");
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.row_of(0), Some(0));
        assert_eq!(grid.row_of(1), Some(0));
        assert_eq!(grid.row_of(2), Some(1));
        assert_eq!(grid.row_of(7), Some(2));
        assert_eq!(grid.row_of(8), Some(3));
        assert_eq!(grid.row_of(9), Some(3));
        assert_eq!(grid.row_of(10), None);
    }

    #[test]
    fn invalid_pl_is_rejected() {
        assert!(ReducedGaussian::from_pl(vec![]).is_err());
        assert!(ReducedGaussian::from_pl(vec![4, 4, 4]).is_err());
        assert!(ReducedGaussian::from_pl(vec![4, 0]).is_err());
        assert!(ReducedGaussian::octahedral(0).is_err());
    }

    #[test]
    fn iteration_is_complete_and_row_aligned() {
        let grid = ReducedGaussian::from_pl(vec![2, 4, 4, 2]).expect("even pl");
        let points = grid.to_points();
        assert_eq!(points.len(), 12);

        // first row: 2 points half a turn apart at the first latitude
        let lat0 = grid.row_latitude(0);
        assert!(points_equal(&points[0], &Point::lonlat(0., lat0), 1e-12));
        assert!(points_equal(&points[1], &Point::lonlat(180., lat0), 1e-12));

        // second row starts at Greenwich again
        let lat1 = grid.row_latitude(1);
        assert!(points_equal(&points[2], &Point::lonlat(0., lat1), 1e-12));
    }

    #[test]
    fn seek_crosses_rows() {
        let grid = ReducedGaussian::from_pl(vec![2, 4, 4, 2]).expect("even pl");
        let mut it = grid.iter();
        assert!(it.seek(6));

        let p = it.next().expect("in range");
        let q = p.as_lonlat().expect("geographic");
        assert_eq!(q.lat, grid.row_latitude(2));
        assert!(!it.seek(12));
    }
}

//! HEALPix grids (Hierarchical Equal Area isoLatitude Pixelation), in ring
//! or nested ordering.

use std::str::FromStr;
use std::sync::OnceLock;

use geogrid_types::BoundingBox;

use crate::error::GridError;
use crate::grid::Grid;
use crate::iterator::{GridIterator, ReducedIterator, Rows, UnstructuredIterator};
use crate::spec::GridSpec;

/// Point ordering of a HEALPix grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ordering {
    /// Isolatitude rings, north to south, west to east within each ring.
    Ring,
    /// Hierarchical ordering of the 12 base diamonds (requires a
    /// power-of-two `Nside`).
    Nested,
}

impl Ordering {
    /// The ordering name, as it appears in parametrisations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Nested => "nested",
        }
    }
}

impl FromStr for Ordering {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, GridError> {
        match s {
            "ring" => Ok(Self::Ring),
            "nested" => Ok(Self::Nested),
            _ => Err(GridError::Spec(format!("invalid HEALPix ordering '{s}'"))),
        }
    }
}

const MASKS: [u64; 6] = [
    0x0000_0000_ffff_ffff,
    0x0000_ffff_0000_ffff,
    0x00ff_00ff_00ff_00ff,
    0x0f0f_0f0f_0f0f_0f0f,
    0x3333_3333_3333_3333,
    0x5555_5555_5555_5555,
];

fn nest_encode_bits(n: i64) -> i64 {
    let mut b = (n as u64) & MASKS[0];
    b = (b ^ (b << 16)) & MASKS[1];
    b = (b ^ (b << 8)) & MASKS[2];
    b = (b ^ (b << 4)) & MASKS[3];
    b = (b ^ (b << 2)) & MASKS[4];
    b = (b ^ (b << 1)) & MASKS[5];
    b as i64
}

fn nest_decode_bits(n: i64) -> i64 {
    let mut b = (n as u64) & MASKS[5];
    b = (b ^ (b >> 1)) & MASKS[4];
    b = (b ^ (b >> 2)) & MASKS[3];
    b = (b ^ (b >> 4)) & MASKS[2];
    b = (b ^ (b >> 8)) & MASKS[1];
    b = (b ^ (b >> 16)) & MASKS[0];
    b as i64
}

fn nest_to_fij(n: i64, k: i64) -> (i64, i64, i64) {
    let f = n >> (2 * k);
    let n = n & ((1 << (2 * k)) - 1);
    (f, nest_decode_bits(n), nest_decode_bits(n >> 1))
}

fn fij_to_nest(f: i64, i: i64, j: i64, k: i64) -> i64 {
    (f << (2 * k)) + nest_encode_bits(i) + (nest_encode_bits(j) << 1)
}

fn isqrt(n: i64) -> i64 {
    (n as f64 + 0.5).sqrt() as i64
}

// division result within [0; 3]
fn div_03(a: i64, b: i64) -> i64 {
    let t = i64::from(a >= (b << 1));
    let a = a - t * (b << 1);
    (t << 1) + i64::from(a >= b)
}

fn pll(f: i64) -> i64 {
    const PLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];
    PLL[f as usize]
}

/// Index converter between ring and nested orderings.
struct Reorder {
    nside: i64,
    npix: i64,
    ncap: i64,
    k: i64,
}

impl Reorder {
    fn new(nside: usize) -> Self {
        let n = nside as i64;
        Self {
            nside: n,
            npix: 12 * n * n,
            ncap: (n * (n - 1)) << 1,
            k: if nside.is_power_of_two() {
                nside.trailing_zeros() as i64
            } else {
                -1
            },
        }
    }

    fn to_nest(&self, f: i64, ring: i64, nring: i64, phi: i64, shift: i64) -> i64 {
        let r = ((2 + (f >> 2)) << self.k) - ring - 1;
        let mut p = 2 * phi - pll(f) * nring - shift - 1;
        if p >= 2 * self.nside {
            p -= 8 * self.nside;
        }

        let i = (r + p) >> 1;
        let j = (r - p) >> 1;
        fij_to_nest(f, i, j, self.k)
    }

    fn ring_to_nest(&self, r: i64) -> i64 {
        if r < self.ncap {
            // North polar cap
            let nring = (1 + isqrt(2 * r + 1)) >> 1;
            let phi = 1 + r - 2 * nring * (nring - 1);
            let f = div_03(phi - 1, nring);

            return self.to_nest(f, nring, nring, phi, 0);
        }

        if self.npix - self.ncap <= r {
            // South polar cap
            let nring = (1 + isqrt(2 * self.npix - 2 * r - 1)) >> 1;
            let phi = 1 + r + 2 * nring * (nring - 1) + 4 * nring - self.npix;
            let ring = 4 * self.nside - nring;
            let f = div_03(phi - 1, nring) + 8;

            return self.to_nest(f, ring, nring, phi, 0);
        }

        // Equatorial belt
        let ip = r - self.ncap;
        let tmp = ip >> (self.k + 2);

        let nring = self.nside;
        let phi = ip - tmp * 4 * self.nside + 1;
        let ring = tmp + self.nside;

        let ifm = 1 + ((phi - 1 - ((1 + tmp) >> 1)) >> self.k);
        let ifp = 1 + ((phi - 1 - ((1 - tmp + 2 * self.nside) >> 1)) >> self.k);
        let f = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };

        self.to_nest(f, ring, nring, phi, (ring + self.nside) & 1)
    }

    fn nest_to_ring(&self, n: i64) -> i64 {
        let (f, i, j) = nest_to_fij(n, self.k);

        let to_ring_local = |f: i64, i: i64, j: i64, nring: i64, shift: i64| -> i64 {
            let nring = nring >> 2;
            let r = (pll(f) * nring + i - j + 1 + shift) / 2 - 1;
            if r < 0 {
                r + 4 * self.nside
            } else {
                r
            }
        };

        // 1-based ring number
        let ring = ((f >> 2) + 2) * self.nside - i - j - 1;
        if ring < self.nside {
            // North polar cap
            let nring = 4 * ring;
            let r0 = 2 * ring * (ring - 1);

            return r0 + to_ring_local(f, i, j, nring, 0);
        }

        if ring < 3 * self.nside {
            // Equatorial belt
            let nring = 4 * self.nside;
            let r0 = self.ncap + (ring - self.nside) * nring;
            let shift = (ring - self.nside) & 1;

            return r0 + to_ring_local(f, i, j, nring, shift);
        }

        // South polar cap
        let n = 4 * self.nside - ring;
        let nring = 4 * n;
        let r0 = self.npix - 2 * n * (n + 1);

        r0 + to_ring_local(f, i, j, nring, 0)
    }
}

/// HEALPix grid of a given `Nside`: `12·Nside²` equal-area pixels on
/// `4·Nside - 1` isolatitude rings.
#[derive(Debug)]
pub struct Healpix {
    nside: usize,
    ordering: Ordering,
    latitudes: OnceLock<Vec<f64>>,
    niacc: OnceLock<Vec<usize>>,
}

impl Healpix {
    /// Creates a grid; nested ordering requires a power-of-two `Nside`.
    pub fn new(nside: usize, ordering: Ordering) -> Result<Self, GridError> {
        if nside == 0 {
            return Err(GridError::Range("Nside must be positive".to_string()));
        }
        if ordering == Ordering::Nested && !nside.is_power_of_two() {
            return Err(GridError::Range(format!(
                "nested ordering requires a power-of-two Nside, got {nside}"
            )));
        }
        Ok(Self {
            nside,
            ordering,
            latitudes: OnceLock::new(),
            niacc: OnceLock::new(),
        })
    }

    /// The grid's `Nside`.
    pub fn nside(&self) -> usize {
        self.nside
    }

    /// The point ordering.
    pub fn ordering(&self) -> Ordering {
        self.ordering
    }

    /// Number of rings.
    pub fn nj(&self) -> usize {
        4 * self.nside - 1
    }

    /// Number of pixels on ring `j` (counted from the north).
    pub fn ni(&self, j: usize) -> usize {
        if j < self.nside {
            4 * (j + 1)
        } else if j < 3 * self.nside {
            4 * self.nside
        } else {
            4 * (self.nj() - j)
        }
    }

    /// The permutation mapping this grid's indices to `to`-ordered indices
    /// of the same pixels: `permutation[i]` is the source index of point
    /// `i`. Converting to or from nested requires a power-of-two `Nside`.
    pub fn reorder(&self, to: Ordering) -> Result<Vec<usize>, GridError> {
        let reorder = Reorder::new(self.nside);
        if self.ordering == to {
            return Ok((0..self.size()).collect());
        }
        if reorder.k < 0 {
            return Err(GridError::Range(format!(
                "cannot reorder {} to {} with Nside {}",
                self.ordering.as_str(),
                to.as_str(),
                self.nside
            )));
        }

        let from_nested = self.ordering == Ordering::Nested;
        Ok((0..self.size() as i64)
            .map(|i| {
                let j = if from_nested {
                    reorder.nest_to_ring(i)
                } else {
                    reorder.ring_to_nest(i)
                };
                j as usize
            })
            .collect())
    }

    fn latitudes(&self) -> &[f64] {
        self.latitudes.get_or_init(|| {
            let nj = self.nj();
            let ns = self.nside as f64;
            let mut lats = vec![0.; nj];
            for ring in 1..2 * self.nside {
                let f = if ring < self.nside {
                    1. - (ring * ring) as f64 / (3. * ns * ns)
                } else {
                    4. / 3. - 2. * ring as f64 / (3. * ns)
                };
                let lat = 90. - f.acos().to_degrees();
                lats[ring - 1] = lat;
                lats[nj - ring] = -lat;
            }
            lats
        })
    }

    fn niacc(&self) -> &[usize] {
        self.niacc.get_or_init(|| {
            let nj = self.nj();
            let mut acc = Vec::with_capacity(nj + 1);
            acc.push(0);
            let mut total = 0;
            for j in 0..nj {
                total += self.ni(j);
                acc.push(total);
            }
            acc
        })
    }

    /// Coordinates in nested order, by permuting the ring-ordered rows.
    fn nested_latlons(&self) -> (Vec<f64>, Vec<f64>) {
        let mut ring_lons = Vec::with_capacity(self.size());
        let mut ring_lats = Vec::with_capacity(self.size());
        for j in 0..self.nj() {
            let lat = self.row_latitude(j);
            for lon in self.row_longitudes(j) {
                ring_lons.push(lon);
                ring_lats.push(lat);
            }
        }

        let reorder = Reorder::new(self.nside);
        let mut lons = Vec::with_capacity(self.size());
        let mut lats = Vec::with_capacity(self.size());
        for i in 0..self.size() as i64 {
            let r = reorder.nest_to_ring(i) as usize;
            lons.push(ring_lons[r]);
            lats.push(ring_lats[r]);
        }
        (lons, lats)
    }
}

pub(crate) fn build_healpix(spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
    let nside = spec.require_u64("nside")? as usize;
    let ordering = spec.get_str("ordering").unwrap_or("ring").parse()?;
    Ok(Box::new(Healpix::new(nside, ordering)?))
}

impl Rows for Healpix {
    fn rows(&self) -> usize {
        self.nj()
    }

    fn row_latitude(&self, j: usize) -> f64 {
        self.latitudes()[j]
    }

    fn row_longitudes(&self, j: usize) -> Vec<f64> {
        let ni = self.ni(j);
        let step = 360. / ni as f64;
        // rings in the polar caps, and every other ring of the equatorial
        // belt, are offset by half a step
        let start = if j < self.nside || 3 * self.nside - 1 < j || (j + self.nside) % 2 == 1 {
            step / 2.
        } else {
            0.
        };
        (0..ni).map(|i| start + i as f64 * step).collect()
    }

    fn row_start(&self, j: usize) -> usize {
        self.niacc()[j]
    }
}

impl Grid for Healpix {
    fn size(&self) -> usize {
        12 * self.nside * self.nside
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::global()
    }

    // no pixel centre sits on a pole
    fn includes_north_pole(&self) -> bool {
        false
    }

    fn includes_south_pole(&self) -> bool {
        false
    }

    fn is_periodic_west_east(&self) -> bool {
        true
    }

    fn iter(&self) -> GridIterator<'_> {
        match self.ordering {
            Ordering::Ring => GridIterator::Reduced(ReducedIterator::new(self, None)),
            Ordering::Nested => {
                let (lons, lats) = self.nested_latlons();
                GridIterator::Unstructured(UnstructuredIterator::owned(lons, lats))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn sizes_and_rings() {
        let h1 = Healpix::new(1, Ordering::Ring).expect("positive Nside");
        assert_eq!(h1.size(), 12);
        assert_eq!(h1.nj(), 3);

        let h2 = Healpix::new(2, Ordering::Ring).expect("positive Nside");
        assert_eq!(h2.size(), 48);
        assert_eq!(h2.nj(), 7);
        assert_eq!(
            (0..h2.nj()).map(|j| h2.ni(j)).collect::<Vec<_>>(),
            vec![4, 8, 8, 8, 8, 8, 4]
        );
        assert_eq!(h2.row_start(h2.nj()), 48);

        assert!(Healpix::new(0, Ordering::Ring).is_err());
        assert!(Healpix::new(3, Ordering::Nested).is_err());
        assert!(Healpix::new(4, Ordering::Nested).is_ok());
    }

    #[test]
    fn ring_latitudes_are_symmetric() {
        let grid = Healpix::new(2, Ordering::Ring).expect("positive Nside");
        let lats: Vec<_> = (0..grid.nj()).map(|j| grid.row_latitude(j)).collect();

        assert_eq!(lats[3], 0.);
        for j in 0..grid.nj() {
            assert_abs_diff_eq!(lats[j], -lats[grid.nj() - 1 - j], epsilon = 1e-12);
        }
        assert!(lats.windows(2).all(|w| w[0] > w[1]));

        // top ring of any Nside=1 grid: 4 pixels offset by half a step
        let h1 = Healpix::new(1, Ordering::Ring).expect("positive Nside");
        assert_eq!(h1.row_longitudes(0), vec![45., 135., 225., 315.]);
        assert_abs_diff_eq!(
            h1.row_latitude(0),
            90. - (2. / 3_f64).acos().to_degrees(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn reorderings_are_inverse_permutations() {
        for nside in [1, 2, 4] {
            let grid = Healpix::new(nside, Ordering::Ring).expect("positive Nside");
            let ring_to_nest = grid.reorder(Ordering::Nested).expect("power of two");

            let mut seen = vec![false; grid.size()];
            for &i in &ring_to_nest {
                assert!(!seen[i], "not a permutation");
                seen[i] = true;
            }

            let reorder = Reorder::new(nside);
            for r in 0..grid.size() as i64 {
                assert_eq!(reorder.nest_to_ring(reorder.ring_to_nest(r)), r);
            }
        }
    }

    #[test]
    fn reorder_identity_and_rejection() {
        let grid = Healpix::new(3, Ordering::Ring).expect("positive Nside");
        assert_eq!(
            grid.reorder(Ordering::Ring).expect("identity"),
            (0..grid.size()).collect::<Vec<_>>()
        );
        assert!(grid.reorder(Ordering::Nested).is_err());
    }

    #[test]
    fn nested_iteration_permutes_ring_points() {
        for nside in [1, 2] {
            let ring = Healpix::new(nside, Ordering::Ring).expect("positive Nside");
            let nested = Healpix::new(nside, Ordering::Nested).expect("power of two");

            let ring_points = ring.to_points();
            let nested_points = nested.to_points();
            assert_eq!(nested_points.len(), ring_points.len());

            let nest_to_ring = nested.reorder(Ordering::Ring).expect("power of two");
            for (i, p) in nested_points.iter().enumerate() {
                assert_eq!(*p, ring_points[nest_to_ring[i]]);
            }
        }
    }

    #[test]
    fn ring_iteration_is_complete() {
        let grid = Healpix::new(4, Ordering::Ring).expect("positive Nside");
        assert_eq!(grid.iter().count(), grid.size());
        assert_eq!(grid.to_latlons().0.len(), grid.size());
    }
}

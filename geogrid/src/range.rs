//! Monotonic coordinate value sequences along one grid axis.

use std::sync::OnceLock;

use geogrid_types::PointLonLat;

use crate::cache;
use crate::error::GridError;

/// A coordinate axis: either regularly spaced or Gaussian.
#[derive(Debug, Clone)]
pub enum Range {
    /// Regularly spaced values.
    Regular(RegularRange),
    /// Gaussian latitudes.
    Gaussian(GaussianRange),
}

impl Range {
    /// Number of values.
    pub fn size(&self) -> usize {
        match self {
            Self::Regular(r) => r.size(),
            Self::Gaussian(g) => g.size(),
        }
    }

    /// The values, computed once.
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Regular(r) => r.values(),
            Self::Gaussian(g) => g.values(),
        }
    }
}

/// Evenly spaced values over `[a, b]`, divided into `n` intervals.
///
/// Values may increase or decrease; with `endpoint`, `b` itself is included
/// (`n + 1` values), otherwise the last interval stays open (`n` values,
/// the periodic-longitude case).
#[derive(Debug, Clone)]
pub struct RegularRange {
    n: usize,
    a: f64,
    b: f64,
    endpoint: bool,
    values: OnceLock<Vec<f64>>,
}

impl RegularRange {
    /// Creates a range of `n` intervals over `[a, b]`.
    pub fn new(n: usize, a: f64, b: f64, endpoint: bool) -> Result<Self, GridError> {
        if n == 0 {
            return Err(GridError::Range("empty range (n = 0)".to_string()));
        }
        Ok(Self {
            n,
            a,
            b,
            endpoint,
            values: OnceLock::new(),
        })
    }

    /// A full turn of `n` longitudes starting at `west`, excluding the
    /// wrapped duplicate of the first value.
    pub fn periodic(n: usize, west: f64) -> Result<Self, GridError> {
        Self::new(n, west, west + PointLonLat::FULL_ANGLE, false)
    }

    /// First bound.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Second bound.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Spacing between consecutive values.
    pub fn increment(&self) -> f64 {
        (self.b - self.a) / self.n as f64
    }

    /// Whether the range spans a full turn without its endpoint.
    pub fn is_periodic(&self) -> bool {
        !self.endpoint && (self.b - self.a).abs() >= PointLonLat::FULL_ANGLE - PointLonLat::EPS
    }

    /// Number of values.
    pub fn size(&self) -> usize {
        if self.endpoint {
            self.n + 1
        } else {
            self.n
        }
    }

    /// The values, computed once.
    pub fn values(&self) -> &[f64] {
        self.values.get_or_init(|| {
            let step = self.increment();
            (0..self.size()).map(|i| self.a + step * i as f64).collect()
        })
    }
}

/// The Gaussian latitudes of order `N` (2N values, north to south),
/// optionally cropped to `[south, north]`.
#[derive(Debug, Clone)]
pub struct GaussianRange {
    n: usize,
    south: f64,
    north: f64,
    values: OnceLock<Vec<f64>>,
}

impl GaussianRange {
    /// Creates the full range of order `n`.
    pub fn new(n: usize) -> Result<Self, GridError> {
        Self::cropped(n, -90., 90.)
    }

    /// Creates the range of order `n`, keeping only latitudes within
    /// `[south, north]`.
    pub fn cropped(n: usize, south: f64, north: f64) -> Result<Self, GridError> {
        if n == 0 {
            return Err(GridError::Range("Gaussian order must be positive".to_string()));
        }
        if south > north {
            return Err(GridError::Range(format!("south {south} > north {north}")));
        }
        Ok(Self {
            n,
            south,
            north,
            values: OnceLock::new(),
        })
    }

    /// The Gaussian order `N`.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Number of values after cropping.
    pub fn size(&self) -> usize {
        self.values().len()
    }

    /// The latitudes, computed once and shared per order across grids.
    pub fn values(&self) -> &[f64] {
        self.values.get_or_init(|| {
            cache::gaussian_latitudes(self.n)
                .iter()
                .copied()
                .filter(|lat| {
                    self.south - PointLonLat::EPS <= *lat && *lat <= self.north + PointLonLat::EPS
                })
                .collect()
        })
    }
}

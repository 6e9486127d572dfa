//! Regular latitude-longitude and regular Gaussian grids.

use geogrid_types::{BoundingBox, PointLonLat};

use crate::error::GridError;
use crate::grid::Grid;
use crate::iterator::{GridIterator, RegularIterator};
use crate::projection::{projection_from_spec, Projection};
use crate::range::{GaussianRange, RegularRange};
use crate::spec::GridSpec;

fn lon_range(ni: usize, west: f64, east: f64, periodic: bool) -> Result<RegularRange, GridError> {
    if periodic {
        RegularRange::periodic(ni, west)
    } else {
        match ni {
            0 => Err(GridError::Range("empty range (ni = 0)".to_string())),
            1 => RegularRange::new(1, west, west, false),
            _ => RegularRange::new(ni - 1, west, east, true),
        }
    }
}

fn lat_range(nj: usize, north: f64, south: f64) -> Result<RegularRange, GridError> {
    match nj {
        0 => Err(GridError::Range("empty range (nj = 0)".to_string())),
        1 => RegularRange::new(1, north, north, false),
        _ => RegularRange::new(nj - 1, north, south, true),
    }
}

/// Regular latitude-longitude grid: the cartesian product of `ni`
/// longitudes and `nj` latitudes over a bounding box, scanned west to east,
/// north to south.
#[derive(Debug)]
pub struct RegularLL {
    lon: RegularRange,
    lat: RegularRange,
    bbox: BoundingBox,
    projection: Option<Box<dyn Projection>>,
}

impl RegularLL {
    /// Creates a grid of `ni × nj` points over `bbox`. Boxes spanning the
    /// full turn get periodic longitudes (no duplicate column at the wrap).
    pub fn new(ni: usize, nj: usize, bbox: BoundingBox) -> Result<Self, GridError> {
        Ok(Self {
            lon: lon_range(ni, bbox.west(), bbox.east(), bbox.is_periodic_west_east())?,
            lat: lat_range(nj, bbox.north(), bbox.south())?,
            bbox,
            projection: None,
        })
    }

    /// Creates a global grid from increments in degrees; `dx` must divide
    /// the full turn and `dy` the half turn.
    pub fn global(dx: f64, dy: f64) -> Result<Self, GridError> {
        if dx <= 0. || dy <= 0. {
            return Err(GridError::Range(format!("invalid increments {dx}/{dy}")));
        }

        let ni = (PointLonLat::FULL_ANGLE / dx).round();
        let nj = (PointLonLat::FLAT_ANGLE / dy).round();
        if (ni * dx - PointLonLat::FULL_ANGLE).abs() > PointLonLat::EPS
            || (nj * dy - PointLonLat::FLAT_ANGLE).abs() > PointLonLat::EPS
        {
            return Err(GridError::Range(format!(
                "increments {dx}/{dy} do not divide the globe"
            )));
        }

        Self::new(ni as usize, nj as usize + 1, BoundingBox::global())
    }

    /// Attaches a projection, applied on iteration; fails if the projection
    /// rejects any grid point.
    pub fn with_projection(mut self, projection: Box<dyn Projection>) -> Result<Self, GridError> {
        super::validate_projection(&self, projection.as_ref())?;
        self.projection = Some(projection);
        Ok(self)
    }

    /// Number of longitudes per row.
    pub fn ni(&self) -> usize {
        self.lon.size()
    }

    /// Number of latitudes.
    pub fn nj(&self) -> usize {
        self.lat.size()
    }
}

pub(crate) fn build_regular_ll(spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
    let bbox = bounding_box_from_spec(spec)?;

    let mut grid = if let (Some(ni), Some(nj)) = (spec.get_u64("ni"), spec.get_u64("nj")) {
        RegularLL::new(ni as usize, nj as usize, bbox)?
    } else {
        let dx = spec.require_f64("west_east_increment")?;
        let dy = spec.require_f64("south_north_increment")?;

        let lon_span = bbox.east() - bbox.west();
        let lat_span = bbox.north() - bbox.south();
        let ni = (lon_span / dx).round();
        let nj = (lat_span / dy).round();
        if dx <= 0.
            || dy <= 0.
            || (ni * dx - lon_span).abs() > PointLonLat::EPS
            || (nj * dy - lat_span).abs() > PointLonLat::EPS
        {
            return Err(GridError::Range(format!(
                "increments {dx}/{dy} do not divide the box"
            )));
        }

        // periodic boxes get no duplicate column at the wrap
        let ni = ni as usize + usize::from(!bbox.is_periodic_west_east());
        RegularLL::new(ni, nj as usize + 1, bbox)?
    };

    if let Some(proj) = projection_spec(spec)? {
        grid = grid.with_projection(proj)?;
    }
    Ok(Box::new(grid))
}

fn bounding_box_from_spec(spec: &GridSpec) -> Result<BoundingBox, GridError> {
    if spec.has("north") || spec.has("south") || spec.has("west") || spec.has("east") {
        Ok(BoundingBox::new(
            spec.get_f64("north").unwrap_or(90.),
            spec.get_f64("west").unwrap_or(0.),
            spec.get_f64("south").unwrap_or(-90.),
            spec.get_f64("east").unwrap_or(360.),
        )?)
    } else {
        Ok(BoundingBox::global())
    }
}

fn projection_spec(spec: &GridSpec) -> Result<Option<Box<dyn Projection>>, GridError> {
    match spec.get_str("projection") {
        Some(name) => {
            let mut proj_spec = GridSpec::new();
            proj_spec.set("type", name);
            for key in ["south_pole_lon", "south_pole_lat", "rotation_angle", "lon_0", "lat_0", "radius"] {
                if let Some(v) = spec.get_f64(key) {
                    proj_spec.set(key, v);
                }
            }
            if let Some(def) = spec.get_str("proj") {
                proj_spec.set("proj", def);
            }
            Ok(Some(projection_from_spec(&proj_spec)?))
        }
        None => Ok(None),
    }
}

impl Grid for RegularLL {
    fn size(&self) -> usize {
        self.ni() * self.nj()
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    fn includes_north_pole(&self) -> bool {
        // within one increment of the pole
        self.bbox.north() + self.lat.increment().abs() > 90.
    }

    fn includes_south_pole(&self) -> bool {
        self.bbox.south() - self.lat.increment().abs() < -90.
    }

    fn is_periodic_west_east(&self) -> bool {
        self.bbox.east() - self.bbox.west() + self.lon.increment() >= PointLonLat::FULL_ANGLE
    }

    fn iter(&self) -> GridIterator<'_> {
        GridIterator::Regular(RegularIterator::new(
            self.lon.values(),
            self.lat.values(),
            self.projection.as_deref(),
        ))
    }

    fn projection(&self) -> Option<&dyn Projection> {
        self.projection.as_deref()
    }
}

/// Regular Gaussian grid `F<N>`: `4N` periodic longitudes by the `2N`
/// Gaussian latitudes of order `N`.
#[derive(Debug)]
pub struct RegularGaussian {
    n: usize,
    lon: RegularRange,
    lat: GaussianRange,
    projection: Option<Box<dyn Projection>>,
}

impl RegularGaussian {
    /// Creates the global grid of order `n`.
    pub fn new(n: usize) -> Result<Self, GridError> {
        Ok(Self {
            n,
            lon: RegularRange::periodic(4 * n, 0.)?,
            lat: GaussianRange::new(n)?,
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
}

pub(crate) fn build_regular_gg(spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
    let mut grid = RegularGaussian::new(spec.require_u64("N")? as usize)?;
    if let Some(proj) = projection_spec(spec)? {
        grid = grid.with_projection(proj)?;
    }
    Ok(Box::new(grid))
}

impl Grid for RegularGaussian {
    fn size(&self) -> usize {
        self.lon.size() * self.lat.size()
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
        GridIterator::Regular(RegularIterator::new(
            self.lon.values(),
            self.lat.values(),
            self.projection.as_deref(),
        ))
    }

    fn projection(&self) -> Option<&dyn Projection> {
        self.projection.as_deref()
    }
}

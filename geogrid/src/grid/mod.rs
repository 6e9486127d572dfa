//! Grid variants and the grid factory.

mod healpix;
mod orca;
mod reduced;
mod regular;
mod unstructured;

pub use healpix::{Healpix, Ordering};
pub use orca::{Arrangement, Orca, OrcaRecord};
pub use reduced::ReducedGaussian;
pub use regular::{RegularGaussian, RegularLL};
pub use unstructured::Unstructured;

use std::collections::BTreeMap;

use geogrid_types::{BoundingBox, Point};

use crate::error::GridError;
use crate::iterator::GridIterator;
use crate::projection::Projection;
use crate::spec::GridSpec;

/// A discretisation of the sphere: an ordered, finite set of points.
pub trait Grid: std::fmt::Debug {
    /// Number of points.
    fn size(&self) -> usize;

    /// The area covered.
    fn bounding_box(&self) -> BoundingBox;

    /// Whether the northernmost row is within one increment of the pole.
    fn includes_north_pole(&self) -> bool;

    /// Whether the southernmost row is within one increment of the pole.
    fn includes_south_pole(&self) -> bool;

    /// Whether the west-east extent wraps the full turn.
    fn is_periodic_west_east(&self) -> bool;

    /// Cursor over the points, in scan order.
    fn iter(&self) -> GridIterator<'_>;

    /// The projection applied on iteration, if any.
    fn projection(&self) -> Option<&dyn Projection> {
        None
    }

    /// Whether the grid has no points.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Content identifier: a checksum over the geographic coordinates, as
    /// lowercase hex.
    fn calculate_uid(&self) -> String {
        let (lats, lons) = self.to_latlons();
        let mut hasher = crc32fast::Hasher::new();
        for v in lats.iter().chain(lons.iter()) {
            hasher.update(&v.to_le_bytes());
        }
        format!("{:08x}", hasher.finalize())
    }

    /// All points, in scan order.
    fn to_points(&self) -> Vec<Point> {
        self.iter().collect()
    }

    /// Latitude and longitude arrays, in scan order. Projected (non
    /// geographic) points are skipped.
    fn to_latlons(&self) -> (Vec<f64>, Vec<f64>) {
        let mut lats = Vec::with_capacity(self.size());
        let mut lons = Vec::with_capacity(self.size());
        for p in self.iter() {
            if let Point::LonLat(q) = p {
                lats.push(q.lat);
                lons.push(q.lon);
            }
        }
        (lats, lons)
    }

    /// The first point in scan order.
    fn first_point(&self) -> Option<Point> {
        self.iter().next()
    }

    /// The last point in scan order.
    fn last_point(&self) -> Option<Point> {
        let mut it = self.iter();
        let size = self.size();
        if size == 0 {
            return None;
        }
        it.seek(size - 1);
        it.next()
    }
}

/// Checks that a projection accepts every point of a grid, so that
/// iteration over the projected grid cannot fail mid-scan.
pub(crate) fn validate_projection(
    grid: &dyn Grid,
    projection: &dyn Projection,
) -> Result<(), GridError> {
    for p in grid.iter() {
        projection.fwd(p)?;
    }
    Ok(())
}

/// Signature of a registered grid builder.
pub type GridBuilder = fn(&GridSpec) -> Result<Box<dyn Grid>, GridError>;

/// Registry of grid builders, dispatching parametrisations by `"type"` and
/// shorthand names ("O320", "F48", "H128", "1/1") to constructors.
///
/// Registration is explicit; a factory is built once at startup and shared,
/// there is no global mutable registry.
pub struct GridFactory {
    builders: BTreeMap<String, GridBuilder>,
}

impl GridFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Creates a factory with the built-in grid types registered.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        for (name, builder) in [
            ("regular_ll", regular::build_regular_ll as GridBuilder),
            ("regular_gg", regular::build_regular_gg),
            ("reduced_gg", reduced::build_reduced_gg),
            ("healpix", healpix::build_healpix),
            ("unstructured", unstructured::build_unstructured),
            ("orca", orca::build_orca),
        ] {
            factory.builders.insert(name.to_string(), builder);
        }
        factory
    }

    /// Registers a builder under a type name; a second registration of the
    /// same name is an error.
    pub fn register(&mut self, name: &str, builder: GridBuilder) -> Result<(), GridError> {
        if self.builders.contains_key(name) {
            return Err(GridError::Spec(format!(
                "grid type '{name}' already registered"
            )));
        }
        self.builders.insert(name.to_string(), builder);
        Ok(())
    }

    /// Builds a grid from its parametrisation, dispatching on `"type"` (or
    /// a shorthand `"grid"` name when no type is given).
    pub fn build(&self, spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
        if !spec.has("type") {
            if let Some(name) = spec.get_str("grid") {
                return self.build_by_name(name);
            }
        }

        let name = spec.require_str("type")?;
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| GridError::UnknownGrid(name.to_string()))?;

        log::debug!("building grid type '{name}'");
        builder(spec)
    }

    /// Builds a grid from a shorthand name: `O<N>` (octahedral reduced
    /// Gaussian), `F<N>` (regular Gaussian), `H<Nside>` (HEALPix, ring) or
    /// `<dx>/<dy>` (global regular latitude-longitude).
    pub fn build_by_name(&self, name: &str) -> Result<Box<dyn Grid>, GridError> {
        self.build(&spec_from_name(name)?)
    }
}

impl Default for GridFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn spec_from_name(name: &str) -> Result<GridSpec, GridError> {
    let unknown = || GridError::UnknownGrid(name.to_string());

    if let Some((dx, dy)) = name.split_once('/') {
        let dx: f64 = dx.trim().parse().map_err(|_| unknown())?;
        let dy: f64 = dy.trim().parse().map_err(|_| unknown())?;

        let mut spec = GridSpec::new();
        spec.set("type", "regular_ll")
            .set("west_east_increment", dx)
            .set("south_north_increment", dy);
        return Ok(spec);
    }

    if !name.is_ascii() || name.len() < 2 {
        return Err(unknown());
    }
    let (prefix, digits) = name.split_at(1);
    let n: u64 = digits.parse().map_err(|_| unknown())?;
    if n == 0 {
        return Err(unknown());
    }

    let mut spec = GridSpec::new();
    match prefix {
        "o" | "O" => spec.set("type", "reduced_gg").set("N", n).set("octahedral", true),
        "f" | "F" => spec.set("type", "regular_gg").set("N", n),
        "h" | "H" => spec.set("type", "healpix").set("nside", n).set("ordering", "ring"),
        _ => return Err(unknown()),
    };
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn build_flat(_spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
        Ok(Box::new(
            Unstructured::new(vec![0.], vec![0.]).expect("one point"),
        ))
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let mut factory = GridFactory::new();
        factory.register("flat", build_flat).expect("first registration");
        assert_matches!(factory.register("flat", build_flat), Err(GridError::Spec(_)));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let factory = GridFactory::with_defaults();
        let spec = GridSpec::from_value(json!({"type": "icosahedral"})).expect("object");
        assert_matches!(factory.build(&spec), Err(GridError::UnknownGrid(_)));
        assert_matches!(factory.build_by_name("X99"), Err(GridError::UnknownGrid(_)));
        assert_matches!(factory.build_by_name("O0"), Err(GridError::UnknownGrid(_)));
        assert_matches!(factory.build_by_name(""), Err(GridError::UnknownGrid(_)));
    }

    #[test]
    fn shorthand_names() {
        let factory = GridFactory::with_defaults();

        assert_eq!(factory.build_by_name("O4").expect("octahedral").size(), 2 * (20 + 24 + 28 + 32));
        assert_eq!(factory.build_by_name("F2").expect("regular gg").size(), 8 * 4);
        assert_eq!(factory.build_by_name("H2").expect("healpix").size(), 48);
        assert_eq!(factory.build_by_name("1/1").expect("regular ll").size(), 360 * 181);
    }

    #[test]
    fn grid_name_key_dispatches_too() {
        let factory = GridFactory::with_defaults();
        let spec = GridSpec::from_value(json!({"grid": "H4"})).expect("object");
        assert_eq!(factory.build(&spec).expect("healpix").size(), 192);
    }
}

//! ORCA tripolar grids, read from pre-computed coordinate records.

use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use geogrid_types::BoundingBox;

use crate::error::GridError;
use crate::grid::Grid;
use crate::iterator::{GridIterator, UnstructuredIterator};
use crate::spec::GridSpec;

/// Staggering of an ORCA field within its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrangement {
    /// Cell corner.
    F,
    /// Cell centre.
    T,
    /// Cell east edge.
    U,
    /// Cell north edge.
    V,
    /// Vertical velocity (same horizontal position as T).
    W,
}

impl Arrangement {
    /// The arrangement letter, as it appears in grid names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::F => "F",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
        }
    }
}

impl FromStr for Arrangement {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, GridError> {
        match s {
            "F" => Ok(Self::F),
            "T" => Ok(Self::T),
            "U" => Ok(Self::U),
            "V" => Ok(Self::V),
            "W" => Ok(Self::W),
            _ => Err(GridError::Spec(format!("invalid ORCA arrangement '{s}'"))),
        }
    }
}

const MAGIC: &[u8; 4] = b"ORCA";
const VERSION: u8 = 0;
const FLAG_DEFLATE: u8 = 1;

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], GridError> {
        if self.pos + n > self.buf.len() {
            return Err(GridError::Record("truncated ORCA record".to_string()));
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn i32(&mut self) -> Result<i32, GridError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f64(&mut self) -> Result<f64, GridError> {
        let b = self.take(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn f64s(&mut self, n: usize) -> Result<Vec<f64>, GridError> {
        (0..n).map(|_| self.f64()).collect()
    }
}

/// Pre-computed coordinates of one ORCA grid: dimensions, halo, pivot and
/// per-point longitude, latitude and land-sea flags.
#[derive(Clone, Debug, PartialEq)]
pub struct OrcaRecord {
    dimensions: [i32; 2],
    halo: [i32; 4],
    pivot: [f64; 2],
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
    flags: Vec<u8>,
}

impl OrcaRecord {
    /// Assembles a record; array lengths must match the dimensions.
    pub fn new(
        dimensions: [i32; 2],
        halo: [i32; 4],
        pivot: [f64; 2],
        longitudes: Vec<f64>,
        latitudes: Vec<f64>,
        flags: Vec<u8>,
    ) -> Result<Self, GridError> {
        if dimensions[0] <= 0 || dimensions[1] <= 0 {
            return Err(GridError::Record(format!(
                "invalid dimensions {dimensions:?}"
            )));
        }
        let n = dimensions[0] as usize * dimensions[1] as usize;
        if longitudes.len() != n || latitudes.len() != n || flags.len() != n {
            return Err(GridError::Record(format!(
                "coordinate arrays do not match dimensions {dimensions:?}"
            )));
        }
        Ok(Self {
            dimensions,
            halo,
            pivot,
            longitudes,
            latitudes,
            flags,
        })
    }

    /// Reads a record file.
    pub fn read(path: &Path) -> Result<Self, GridError> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Decodes a record from its serialised form.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, GridError> {
        let mut r = Reader { buf, pos: 0 };
        if r.take(4)? != MAGIC {
            return Err(GridError::Record("not an ORCA record".to_string()));
        }
        let version = r.take(1)?[0];
        if version != VERSION {
            return Err(GridError::Record(format!(
                "unsupported ORCA record version {version}"
            )));
        }

        let flags = r.take(1)?[0];
        let payload;
        let mut r = if flags & FLAG_DEFLATE != 0 {
            let mut inflated = Vec::new();
            ZlibDecoder::new(&buf[r.pos..])
                .read_to_end(&mut inflated)
                .map_err(|e| GridError::Record(format!("corrupt ORCA record: {e}")))?;
            payload = inflated;
            Reader {
                buf: &payload,
                pos: 0,
            }
        } else {
            r
        };

        let dimensions = [r.i32()?, r.i32()?];
        let halo = [r.i32()?, r.i32()?, r.i32()?, r.i32()?];
        let pivot = [r.f64()?, r.f64()?];
        if dimensions[0] <= 0 || dimensions[1] <= 0 {
            return Err(GridError::Record(format!(
                "invalid dimensions {dimensions:?}"
            )));
        }

        let n = dimensions[0] as usize * dimensions[1] as usize;
        let longitudes = r.f64s(n)?;
        let latitudes = r.f64s(n)?;
        let flags = r.take(n)?.to_vec();

        Self::new(dimensions, halo, pivot, longitudes, latitudes, flags)
    }

    /// Serialises the record, deflate-compressing the payload on request.
    pub fn to_bytes(&self, compress: bool) -> Result<Vec<u8>, GridError> {
        let mut payload = Vec::with_capacity(self.footprint());
        for d in self.dimensions {
            payload.extend_from_slice(&d.to_le_bytes());
        }
        for h in self.halo {
            payload.extend_from_slice(&h.to_le_bytes());
        }
        for p in self.pivot {
            payload.extend_from_slice(&p.to_le_bytes());
        }
        for v in self.longitudes.iter().chain(self.latitudes.iter()) {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        payload.extend_from_slice(&self.flags);

        let mut out = Vec::with_capacity(payload.len() + 6);
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.push(if compress { FLAG_DEFLATE } else { 0 });
        if compress {
            let mut encoder = ZlibEncoder::new(out, Compression::default());
            encoder.write_all(&payload)?;
            out = encoder.finish()?;
        } else {
            out.extend_from_slice(&payload);
        }
        Ok(out)
    }

    /// Writes the record to a file.
    pub fn write(&self, path: &Path, compress: bool) -> Result<(), GridError> {
        std::fs::write(path, self.to_bytes(compress)?)?;
        Ok(())
    }

    /// Verifies the record against a parametrisation's `dimensions`, `halo`
    /// and `pivot`, where given.
    pub fn check(&self, spec: &GridSpec) -> Result<(), GridError> {
        if let Some(dims) = spec.get_i64s("dimensions") {
            if dims != self.dimensions.map(i64::from) {
                return Err(GridError::Record(format!(
                    "dimensions mismatch: expected {dims:?}, record has {:?}",
                    self.dimensions
                )));
            }
        }
        if let Some(halo) = spec.get_i64s("halo") {
            if halo != self.halo.map(i64::from) {
                return Err(GridError::Record(format!(
                    "halo mismatch: expected {halo:?}, record has {:?}",
                    self.halo
                )));
            }
        }
        if let Some(pivot) = spec.get_f64s("pivot") {
            if pivot != self.pivot {
                return Err(GridError::Record(format!(
                    "pivot mismatch: expected {pivot:?}, record has {:?}",
                    self.pivot
                )));
            }
        }
        Ok(())
    }

    /// Content identifier over the arrangement and coordinates.
    pub fn calculate_uid(&self, arrangement: Arrangement) -> String {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(arrangement.as_str().as_bytes());
        for v in self.latitudes.iter().chain(self.longitudes.iter()) {
            hasher.update(&v.to_le_bytes());
        }
        format!("{:08x}", hasher.finalize())
    }

    /// In-memory size, in bytes.
    pub fn footprint(&self) -> usize {
        std::mem::size_of::<Self>()
            + 16 * self.longitudes.len()
            + self.flags.len()
    }

    /// Number of points west to east, including halo columns.
    pub fn ni(&self) -> usize {
        self.dimensions[0] as usize
    }

    /// Number of points south to north, including halo rows.
    pub fn nj(&self) -> usize {
        self.dimensions[1] as usize
    }

    /// Per-point land-sea flags.
    pub fn flags(&self) -> &[u8] {
        &self.flags
    }
}

/// ORCA tripolar grid: a fixed unstructured layout identified by name and
/// arrangement, with coordinates taken from a record.
#[derive(Debug)]
pub struct Orca {
    name: String,
    arrangement: Arrangement,
    record: OrcaRecord,
}

impl Orca {
    /// Creates a grid over a coordinate record.
    pub fn new(name: &str, arrangement: Arrangement, record: OrcaRecord) -> Self {
        Self {
            name: name.to_string(),
            arrangement,
            record,
        }
    }

    /// The grid name, e.g. `"ORCA2"` or `"eORCA025"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field staggering.
    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    /// The underlying coordinate record.
    pub fn record(&self) -> &OrcaRecord {
        &self.record
    }
}

pub(crate) fn build_orca(spec: &GridSpec) -> Result<Box<dyn Grid>, GridError> {
    let name = spec.require_str("name")?.to_string();
    let arrangement = spec.get_str("arrangement").unwrap_or("T").parse()?;

    let path = spec.require_str("path")?;
    let record = OrcaRecord::read(Path::new(path))?;
    record.check(spec)?;

    Ok(Box::new(Orca::new(&name, arrangement, record)))
}

impl Grid for Orca {
    fn size(&self) -> usize {
        self.record.longitudes.len()
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::global()
    }

    fn includes_north_pole(&self) -> bool {
        true
    }

    // TODO: confirm with the mesh providers that the southernmost row
    // should count as reaching the pole; tripolar layouts stop at the
    // Antarctic coast
    fn includes_south_pole(&self) -> bool {
        true
    }

    fn is_periodic_west_east(&self) -> bool {
        true
    }

    fn iter(&self) -> GridIterator<'_> {
        GridIterator::Unstructured(UnstructuredIterator::new(
            &self.record.longitudes,
            &self.record.latitudes,
            None,
        ))
    }

    fn calculate_uid(&self) -> String {
        self.record.calculate_uid(self.arrangement)
    }
}

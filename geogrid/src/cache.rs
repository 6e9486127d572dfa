//! Global memoized tables, shared across grids.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::gaussian;

lazy_static! {
    static ref GAUSSIAN_LATITUDES: Mutex<HashMap<usize, Arc<Vec<f64>>>> =
        Mutex::new(HashMap::new());
}

/// The Gaussian latitudes of order `n`, computed once per process.
pub fn gaussian_latitudes(n: usize) -> Arc<Vec<f64>> {
    let mut cache = GAUSSIAN_LATITUDES.lock();
    cache
        .entry(n)
        .or_insert_with(|| {
            log::debug!("computing Gaussian latitudes, order {n}");
            Arc::new(gaussian::gaussian_latitudes(n))
        })
        .clone()
}

/// Bytes held by the cached tables.
pub fn footprint() -> usize {
    GAUSSIAN_LATITUDES
        .lock()
        .values()
        .map(|v| v.len() * std::mem::size_of::<f64>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_share_the_table() {
        let a = gaussian_latitudes(2);
        let b = gaussian_latitudes(2);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 4);
        assert!(footprint() >= 4 * std::mem::size_of::<f64>());
    }
}

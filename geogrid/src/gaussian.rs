//! Gaussian quadrature latitudes.

/// Computes the `2N` Gaussian latitudes of order `N`, in degrees, sorted
/// north to south.
///
/// The latitudes are the arcsines of the roots of the Legendre polynomial of
/// degree `2N`, found by Newton-Raphson refinement of a trigonometric first
/// guess. The southern hemisphere mirrors the northern one exactly.
pub fn gaussian_latitudes(n: usize) -> Vec<f64> {
    let order = 2 * n;
    let mut latitudes = vec![0.; order];

    for i in 0..n {
        let mut z =
            (std::f64::consts::PI * (i as f64 + 0.75) / (order as f64 + 0.5)).cos();

        for _ in 0..32 {
            // Legendre recurrence for P(z) and its derivative
            let mut p0 = 1.;
            let mut p1 = z;
            for k in 2..=order {
                let pk = ((2 * k - 1) as f64 * z * p1 - (k - 1) as f64 * p0) / k as f64;
                p0 = p1;
                p1 = pk;
            }
            let pp = order as f64 * (z * p1 - p0) / (z * z - 1.);

            let dz = p1 / pp;
            z -= dz;
            if dz.abs() <= 1e-14 {
                break;
            }
        }

        let lat = z.asin().to_degrees();
        latitudes[i] = lat;
        latitudes[order - 1 - i] = -lat;
    }

    latitudes
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn order_one() {
        let lats = gaussian_latitudes(1);
        assert_eq!(lats.len(), 2);
        assert_abs_diff_eq!(lats[0], 35.264389682754654, epsilon = 1e-10);
        assert_eq!(lats[0], -lats[1]);
    }

    #[test]
    fn hemispheres_mirror_exactly() {
        let lats = gaussian_latitudes(16);
        assert_eq!(lats.len(), 32);
        for i in 0..16 {
            assert_eq!(lats[i], -lats[31 - i]);
        }
    }

    #[test]
    fn strictly_decreasing_within_bounds() {
        let lats = gaussian_latitudes(24);
        assert!(lats[0] < 90.);
        assert!(lats.windows(2).all(|w| w[0] > w[1]));
        assert!(*lats.last().expect("non-empty") > -90.);
    }

    #[test]
    fn known_value_for_n_sixteen() {
        // first latitude of the order-16 set
        let lats = gaussian_latitudes(16);
        assert_abs_diff_eq!(lats[0], 85.76058712044382, epsilon = 1e-8);
    }
}

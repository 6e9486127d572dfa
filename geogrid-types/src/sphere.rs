//! Spherical geometry: central angles, great-circle distances, areas and
//! conversion between geographic and earth-centred cartesian coordinates.

use crate::cartesian::PointXYZ;
use crate::error::GeoError;
use crate::lonlat::PointLonLat;

/// Degrees-to-radians conversion factor.
pub const DEGREE_TO_RADIAN: f64 = std::f64::consts::PI / 180.;

/// Radians-to-degrees conversion factor.
pub const RADIAN_TO_DEGREE: f64 = 180. / std::f64::consts::PI;

fn squared(x: f64) -> f64 {
    x * x
}

fn assert_latitude(lat: f64) -> Result<(), GeoError> {
    if (-90. ..=90.).contains(&lat) {
        Ok(())
    } else {
        Err(GeoError::Range(format!("invalid latitude {lat}")))
    }
}

/// Central angle between two geographic points, in radians.
///
/// Uses the arctangent form (Vincenty), well conditioned for all angles.
pub fn central_angle(a: &PointLonLat, b: &PointLonLat) -> Result<f64, GeoError> {
    assert_latitude(a.lat)?;
    assert_latitude(b.lat)?;

    let phi1 = DEGREE_TO_RADIAN * a.lat;
    let phi2 = DEGREE_TO_RADIAN * b.lat;
    let lambda = DEGREE_TO_RADIAN * (b.lon - a.lon);

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_phi2, cos_phi2) = phi2.sin_cos();
    let (sin_lambda, cos_lambda) = lambda.sin_cos();

    let angle = f64::atan2(
        (squared(cos_phi2 * sin_lambda)
            + squared(cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * cos_lambda))
        .sqrt(),
        sin_phi1 * sin_phi2 + cos_phi1 * cos_phi2 * cos_lambda,
    );

    Ok(if angle.abs() <= f64::EPSILON { 0. } else { angle })
}

/// Central angle subtended by two cartesian points on a sphere of the given
/// radius, in radians.
pub fn central_angle_xyz(radius: f64, a: &PointXYZ, b: &PointXYZ) -> Result<f64, GeoError> {
    if radius <= 0. {
        return Err(GeoError::Figure(format!("invalid radius {radius}")));
    }

    let d2 = a.distance2(b);
    if d2 <= f64::EPSILON {
        return Ok(0.);
    }

    let chord = d2.sqrt() / radius;
    Ok((chord * 0.5).asin() * 2.)
}

/// Great-circle distance between two geographic points.
pub fn distance(radius: f64, a: &PointLonLat, b: &PointLonLat) -> Result<f64, GeoError> {
    Ok(radius * central_angle(a, b)?)
}

/// Surface area of the sphere.
pub fn area(radius: f64) -> Result<f64, GeoError> {
    if radius > 0. {
        Ok(4. * std::f64::consts::PI * radius * radius)
    } else {
        Err(GeoError::Figure(format!("invalid radius {radius}")))
    }
}

/// Surface area between two parallels and two meridians, given the
/// west/north and east/south corners.
pub fn area_between(
    radius: f64,
    west_north: &PointLonLat,
    east_south: &PointLonLat,
) -> Result<f64, GeoError> {
    assert_latitude(west_north.lat)?;
    assert_latitude(east_south.lat)?;

    let w = west_north.lon;
    let e = PointLonLat::normalise_angle_to_minimum(east_south.lon, w);

    // a coincident west/east pair from distinct inputs means a full turn
    let longitude_range = if (w - e).abs() <= PointLonLat::EPS
        && (east_south.lon - west_north.lon).abs() > PointLonLat::EPS
    {
        360.
    } else {
        e - w
    };
    debug_assert!(longitude_range <= 360.);

    let n = west_north.lat;
    let s = east_south.lat;
    if s > n {
        return Err(GeoError::Area(format!("south {s} > north {n}")));
    }

    let latitude_fraction = 0.5 * ((DEGREE_TO_RADIAN * n).sin() - (DEGREE_TO_RADIAN * s).sin());
    let longitude_fraction = longitude_range / 360.;

    Ok(area(radius)? * latitude_fraction * longitude_fraction)
}

/// Converts geographic coordinates to earth-centred cartesian coordinates on
/// a sphere of the given radius, at an optional height above the surface.
///
/// Numerical conditioning: `cos φ` is computed as `sqrt(1 - sin²φ)`, the
/// longitude is folded to `[-180, 180)`, `sin λ` is forced to exactly zero
/// on the date line and `cos λ` uses the square-root form in the quadrants
/// where it is well conditioned. Combined, these project accurately to the
/// poles and the quadrant boundaries.
pub fn xyz(radius: f64, p: &PointLonLat, height: f64) -> Result<PointXYZ, GeoError> {
    if radius <= 0. {
        return Err(GeoError::Figure(format!("invalid radius {radius}")));
    }
    assert_latitude(p.lat)?;

    let q = PointLonLat::make(p.lon, p.lat, -180.);
    let lambda = DEGREE_TO_RADIAN * q.lon;
    let phi = DEGREE_TO_RADIAN * q.lat;

    let sin_phi = phi.sin();
    let cos_phi = (1. - sin_phi * sin_phi).sqrt();
    let sin_lambda = if q.lon.abs() < 180. { lambda.sin() } else { 0. };
    let cos_lambda = if q.lon.abs() > 90. {
        lambda.cos()
    } else {
        (1. - sin_lambda * sin_lambda).sqrt()
    };

    let r = radius + height;
    Ok(PointXYZ::new(
        r * cos_phi * cos_lambda,
        r * cos_phi * sin_lambda,
        r * sin_phi,
    ))
}

/// Converts earth-centred cartesian coordinates back to geographic
/// coordinates on a sphere of the given radius.
pub fn lonlat(radius: f64, p: &PointXYZ) -> Result<PointLonLat, GeoError> {
    if radius <= 0. {
        return Err(GeoError::Figure(format!("invalid radius {radius}")));
    }

    // conditioning for both z (poles) and y (meridian plane)
    let x = p.x;
    let y = if p.y.abs() <= f64::EPSILON { 0. } else { p.y };
    let z = p.z.clamp(-radius, radius) / radius;

    Ok(PointLonLat::new(
        RADIAN_TO_DEGREE * f64::atan2(y, x),
        RADIAN_TO_DEGREE * z.asin(),
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const R: f64 = 1.;

    #[test]
    fn central_angle_quadrants() {
        let a = PointLonLat::new(0., 0.);
        let b = PointLonLat::new(90., 0.);
        assert_abs_diff_eq!(
            central_angle(&a, &b).expect("valid latitudes"),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-15
        );

        let p = PointLonLat::new(0., 90.);
        let q = PointLonLat::new(123., -90.);
        assert_abs_diff_eq!(
            central_angle(&p, &q).expect("valid latitudes"),
            std::f64::consts::PI,
            epsilon = 1e-15
        );
    }

    #[test]
    fn invalid_latitude_is_an_error() {
        let a = PointLonLat::new(0., 91.);
        let b = PointLonLat::new(0., 0.);
        assert!(central_angle(&a, &b).is_err());
    }

    #[test]
    fn cartesian_round_trip() {
        for (lon, lat) in [(0., 0.), (90., 0.), (180., 0.), (-180., 45.), (42., -67.), (0., 90.)] {
            let p = PointLonLat::new(lon, lat);
            let c = xyz(R, &p, 0.).expect("valid point");
            let q = lonlat(R, &c).expect("valid point");
            assert!(
                p.is_approximately_equal(&q, 1e-9),
                "({lon}, {lat}) -> {q:?}"
            );
        }
    }

    #[test]
    fn poles_project_exactly() {
        let north = xyz(R, &PointLonLat::new(77., 90.), 0.).expect("valid point");
        assert_eq!(north, PointXYZ::new(0., 0., 1.));

        let date_line = xyz(R, &PointLonLat::new(180., 0.), 0.).expect("valid point");
        assert_eq!(date_line.y, 0.);
    }

    #[test]
    fn areas() {
        assert_abs_diff_eq!(
            area(R).expect("valid radius"),
            4. * std::f64::consts::PI,
            epsilon = 1e-15
        );

        // full globe expressed as a wrapped [0, 360] box
        let globe = area_between(R, &PointLonLat::new(0., 90.), &PointLonLat::new(360., -90.))
            .expect("valid corners");
        assert_abs_diff_eq!(globe, 4. * std::f64::consts::PI, epsilon = 1e-12);

        let quarter = area_between(R, &PointLonLat::new(0., 90.), &PointLonLat::new(180., 0.))
            .expect("valid corners");
        assert_abs_diff_eq!(quarter, std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn south_over_north_is_an_error() {
        assert!(area_between(R, &PointLonLat::new(0., -10.), &PointLonLat::new(10., 10.)).is_err());
    }
}

//! Swiss oblique Mercator projection (CH1903 / LV03 and CH1903+ / LV95)
//!
//! Rigorous double projection on the Bessel 1841 ellipsoid: ellipsoid to
//! sphere (Gauss), then oblique Mercator on the sphere around Bern. The
//! datum link to WGS 84 is the three-parameter geocentric translation that
//! EPSG:2056 and EPSG:21781 carry (`+towgs84=674.374,15.056,405.346`).

use std::f64::consts::FRAC_PI_4;

use lazy_static::lazy_static;

use super::ellipsoid::{self, GeocentricShift, BESSEL_1841, WGS84};

/// CH1903+ to WGS 84 geocentric translation
pub const CH1903_SHIFT: GeocentricShift = GeocentricShift {
    dx: 674.374,
    dy: 15.056,
    dz: 405.346,
};

lazy_static! {
    /// CH1903+ / LV95, EPSG:2056
    pub static ref LV95: SwissProjection = SwissProjection::new(2_600_000.0, 1_200_000.0);
    /// CH1903 / LV03, EPSG:21781
    pub static ref LV03: SwissProjection = SwissProjection::new(600_000.0, 200_000.0);
}

/// Projection constants derived once from the Bern fundamental point
#[derive(Debug, Clone)]
pub struct SwissProjection {
    false_easting: f64,
    false_northing: f64,
    e: f64,
    /// Radius of the projection sphere
    r: f64,
    alpha: f64,
    /// Spherical latitude of the fundamental point
    b0: f64,
    k: f64,
    lambda0: f64,
}

impl SwissProjection {
    /// Build the projection for a false origin
    pub fn new(false_easting: f64, false_northing: f64) -> Self {
        // Bern: 46°57'08.66" N, 7°26'22.50" E
        let phi0 = (46.0_f64 + 57.0 / 60.0 + 8.66 / 3600.0).to_radians();
        let lambda0 = (7.0_f64 + 26.0 / 60.0 + 22.50 / 3600.0).to_radians();

        let e2 = BESSEL_1841.e2();
        let e = e2.sqrt();
        let r = BESSEL_1841.a * (1.0 - e2).sqrt() / (1.0 - e2 * phi0.sin().powi(2));
        let alpha = (1.0 + e2 / (1.0 - e2) * phi0.cos().powi(4)).sqrt();
        let b0 = (phi0.sin() / alpha).asin();
        let k = (FRAC_PI_4 + b0 / 2.0).tan().ln()
            - alpha * (FRAC_PI_4 + phi0 / 2.0).tan().ln()
            + alpha * e / 2.0 * ((1.0 + e * phi0.sin()) / (1.0 - e * phi0.sin())).ln();

        SwissProjection {
            false_easting,
            false_northing,
            e,
            r,
            alpha,
            b0,
            k,
            lambda0,
        }
    }

    /// Bessel geographic (degrees) to projected (easting, northing)
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let lambda = lon_deg.to_radians();
        let e = self.e;

        // Ellipsoid to sphere
        let s = self.alpha * (FRAC_PI_4 + phi / 2.0).tan().ln()
            - self.alpha * e / 2.0 * ((1.0 + e * phi.sin()) / (1.0 - e * phi.sin())).ln()
            + self.k;
        let b = 2.0 * (s.exp().atan() - FRAC_PI_4);
        let l = self.alpha * (lambda - self.lambda0);

        // Equator system to pseudo-equator system
        let l_bar = l.sin().atan2(self.b0.sin() * b.tan() + self.b0.cos() * l.cos());
        let b_bar = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * l.cos()).asin();

        let y = self.r * l_bar;
        let x = self.r / 2.0 * ((1.0 + b_bar.sin()) / (1.0 - b_bar.sin())).ln();

        (y + self.false_easting, x + self.false_northing)
    }

    /// Projected (easting, northing) to Bessel geographic (degrees)
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let y = easting - self.false_easting;
        let x = northing - self.false_northing;
        let e = self.e;

        let l_bar = y / self.r;
        let b_bar = 2.0 * ((x / self.r).exp().atan() - FRAC_PI_4);

        let b = (self.b0.cos() * b_bar.sin() + self.b0.sin() * b_bar.cos() * l_bar.cos()).asin();
        let l = l_bar.sin().atan2(self.b0.cos() * l_bar.cos() - self.b0.sin() * b_bar.tan());

        let lambda = self.lambda0 + l / self.alpha;

        // Sphere to ellipsoid, fixed-point iteration on latitude
        let iso_b = ((FRAC_PI_4 + b / 2.0).tan().ln() - self.k) / self.alpha;
        let mut phi = b;
        for _ in 0..50 {
            let s = iso_b + e * (FRAC_PI_4 + (e * phi.sin()).asin() / 2.0).tan().ln();
            let next = 2.0 * s.exp().atan() - std::f64::consts::FRAC_PI_2;
            let converged = (next - phi).abs() < 1e-15;
            phi = next;
            if converged {
                break;
            }
        }

        (lambda.to_degrees(), phi.to_degrees())
    }

    /// WGS 84 geographic (degrees) to projected coordinates
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (lon, lat) = ellipsoid::shift_geodetic(lon, lat, &WGS84, &BESSEL_1841, |v| {
            CH1903_SHIFT.from_wgs84(v)
        });
        self.forward(lon, lat)
    }

    /// Projected coordinates to WGS 84 geographic (degrees)
    pub fn to_wgs84(&self, easting: f64, northing: f64) -> (f64, f64) {
        let (lon, lat) = self.inverse(easting, northing);
        ellipsoid::shift_geodetic(lon, lat, &BESSEL_1841, &WGS84, |v| CH1903_SHIFT.to_wgs84(v))
    }
}

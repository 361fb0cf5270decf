//! Reference ellipsoids and geocentric datum shifts

/// A reference ellipsoid defined by semi-major axis and inverse flattening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub a: f64,
    /// Inverse flattening
    pub inv_f: f64,
}

/// WGS 84 ellipsoid
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    inv_f: 298.257_223_563,
};

/// GRS 1980 ellipsoid (ETRS89)
pub const GRS80: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    inv_f: 298.257_222_101,
};

/// Bessel 1841 ellipsoid (CH1903 / CH1903+)
pub const BESSEL_1841: Ellipsoid = Ellipsoid {
    a: 6_377_397.155,
    inv_f: 299.152_812_8,
};

impl Ellipsoid {
    /// Flattening
    pub fn f(&self) -> f64 {
        1.0 / self.inv_f
    }

    /// First eccentricity squared
    pub fn e2(&self) -> f64 {
        let f = self.f();
        2.0 * f - f * f
    }

    /// First eccentricity
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Second eccentricity squared
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    /// Radius of curvature in the prime vertical at latitude `lat` (radians)
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.e2() * lat.sin().powi(2)).sqrt()
    }

    /// Geodetic (degrees, meters) to geocentric cartesian coordinates
    pub fn to_geocentric(&self, lon_deg: f64, lat_deg: f64, h: f64) -> [f64; 3] {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let n = self.prime_vertical_radius(lat);

        [
            (n + h) * lat.cos() * lon.cos(),
            (n + h) * lat.cos() * lon.sin(),
            (n * (1.0 - self.e2()) + h) * lat.sin(),
        ]
    }

    /// Geocentric cartesian coordinates to geodetic (degrees, degrees, meters)
    ///
    /// Iterates on latitude until it moves less than 1e-14 radians.
    pub fn to_geodetic(&self, xyz: [f64; 3]) -> (f64, f64, f64) {
        let [x, y, z] = xyz;
        let e2 = self.e2();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - e2));
        let mut h = 0.0;
        for _ in 0..30 {
            let n = self.prime_vertical_radius(lat);
            h = p / lat.cos() - n;
            let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
            let converged = (next - lat).abs() < 1e-14;
            lat = next;
            if converged {
                break;
            }
        }

        (lon.to_degrees(), lat.to_degrees(), h)
    }
}

/// Three-parameter geocentric translation from a local datum to WGS 84
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocentricShift {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl GeocentricShift {
    /// Local datum cartesian to WGS 84 cartesian
    pub fn to_wgs84(&self, xyz: [f64; 3]) -> [f64; 3] {
        [xyz[0] + self.dx, xyz[1] + self.dy, xyz[2] + self.dz]
    }

    /// WGS 84 cartesian to local datum cartesian
    pub fn from_wgs84(&self, xyz: [f64; 3]) -> [f64; 3] {
        [xyz[0] - self.dx, xyz[1] - self.dy, xyz[2] - self.dz]
    }
}

/// Move a geographic position between two datums through geocentric space
///
/// Ellipsoidal height is taken as zero on the way in and dropped on the way
/// out; only horizontal position is shifted.
pub fn shift_geodetic<F>(lon: f64, lat: f64, from: &Ellipsoid, to: &Ellipsoid, shift: F) -> (f64, f64)
where
    F: Fn([f64; 3]) -> [f64; 3],
{
    let xyz = shift(from.to_geocentric(lon, lat, 0.0));
    let (lon, lat, _) = to.to_geodetic(xyz);
    (lon, lat)
}

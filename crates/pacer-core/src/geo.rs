//! Geographic coordinate type and great-circle utilities.
//!
//! `Coordinate` uses `f64` throughout.  Walk steps are a metre or two, and
//! the noise injected around a reported position is under three metres, so
//! single precision (~1 m at the equator) would swallow the signal.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Wrap any angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_bearing(degrees: f64) -> f64 {
    let b = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if b >= 360.0 { 0.0 } else { b }
}

/// A WGS-84 coordinate with altitude in metres.
///
/// Values are immutable: every operation returns a new `Coordinate`.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude:  f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude:  f64,
}

impl Coordinate {
    /// Unchecked constructor.
    #[inline]
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }

    /// Construct a coordinate, rejecting latitudes outside `[-90, 90]` and
    /// longitudes outside `[-180, 180]` (NaN included).
    pub fn try_new(latitude: f64, longitude: f64, altitude: f64) -> CoreResult<Self> {
        let c = Self::new(latitude, longitude, altitude);
        if c.is_valid() {
            Ok(c)
        } else {
            Err(CoreError::InvalidCoordinate { latitude, longitude })
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing from `self` toward `other`, in degrees
    /// clockwise from true north, in `[0, 360)`.
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        normalize_bearing(y.atan2(x).to_degrees())
    }

    /// The point reached by travelling `distance_m` metres from `self` along
    /// a great circle with initial bearing `bearing_deg`.
    ///
    /// Altitude is carried over unchanged.
    pub fn project(&self, distance_m: f64, bearing_deg: f64) -> Coordinate {
        if distance_m == 0.0 {
            return *self;
        }
        let delta = distance_m / EARTH_RADIUS_M;
        let theta = bearing_deg.to_radians();
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();

        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

        // Normalise longitude into [-180, 180].
        let lon2 = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
        Coordinate::new(lat2.to_degrees(), lon2, self.altitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

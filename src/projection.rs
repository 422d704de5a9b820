//! # Projections
//!
//! Converts track points into a metric space where segment deviation is
//! meaningful.
//!
//! | Projector | Dimensions | Metric | Needs |
//! |-----------|------------|--------|-------|
//! | [`Cartesian`] | 2 | Euclidean | nothing (input already metric) |
//! | [`Planar`] | 2 | Euclidean | longitude, latitude |
//! | [`SpaceTime`] | 3 | Squared | longitude, latitude, timestamp |
//! | [`Ellipsoidal`] | 3 | Squared | longitude, latitude, elevation (0 m if absent) |
//!
//! ## Algorithm Notes
//!
//! ### Planar
//!
//! `x = λ`, `y = asinh(tan φ)` in radians. This is the Mercator ordinate, so
//! the projection is conformal and Euclidean distance tracks angular deviation
//! well over moderate extents.
//!
//! ### Space-time
//!
//! Planar `(x, y)` plus `z = Δt · v / R`, where `Δt` is seconds since the
//! first point, `v` the track's average speed and `R` the equatorial radius.
//! Time deviation then weighs the same as spatial deviation in radians.
//!
//! ### Ellipsoidal
//!
//! Geodetic to ECEF conversion on the WGS84 ellipsoid.

use chrono::{DateTime, Utc};

use crate::geo_utils::elapsed_seconds;
use crate::segment::{Coordinate, Metric};
use crate::{ReduceError, TrackPoint};

/// WGS84 semi-major axis (meters).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

/// Maps track points into a metric coordinate space.
pub trait Projector: Sync {
    /// Output coordinate.
    type Coord: Coordinate;

    /// Deviation convention used for every comparison in this space.
    const METRIC: Metric;

    /// Project one point. `index` is its position in the track, for errors.
    fn project(&self, point: &TrackPoint, index: usize) -> Result<Self::Coord, ReduceError>;

    /// Project a whole track, one coordinate per point in the same order.
    fn project_track(&self, points: &[TrackPoint]) -> Result<Vec<Self::Coord>, ReduceError> {
        #[cfg(feature = "parallel")]
        let coords = {
            use rayon::prelude::*;
            points
                .par_iter()
                .enumerate()
                .map(|(i, p)| self.project(p, i))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let coords = points
            .iter()
            .enumerate()
            .map(|(i, p)| self.project(p, i))
            .collect();

        coords
    }
}

fn check_geographic(point: &TrackPoint, index: usize) -> Result<(), ReduceError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(ReduceError::InvalidCoordinate { index })
    }
}

#[inline]
fn mercator(point: &TrackPoint) -> (f64, f64) {
    (
        point.longitude.to_radians(),
        point.latitude.to_radians().tan().asinh(),
    )
}

// =============================================================================
// Cartesian
// =============================================================================

/// Identity projection: longitude and latitude are read as plain `x` and `y`.
///
/// For input that is already in a metric coordinate system.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cartesian;

impl Projector for Cartesian {
    type Coord = [f64; 2];
    const METRIC: Metric = Metric::Euclidean;

    fn project(&self, point: &TrackPoint, index: usize) -> Result<[f64; 2], ReduceError> {
        if point.longitude.is_finite() && point.latitude.is_finite() {
            Ok([point.longitude, point.latitude])
        } else {
            Err(ReduceError::InvalidCoordinate { index })
        }
    }
}

// =============================================================================
// Planar
// =============================================================================

/// Conformal (Mercator) projection in radians.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planar;

impl Projector for Planar {
    type Coord = [f64; 2];
    const METRIC: Metric = Metric::Euclidean;

    fn project(&self, point: &TrackPoint, index: usize) -> Result<[f64; 2], ReduceError> {
        check_geographic(point, index)?;
        let (x, y) = mercator(point);
        Ok([x, y])
    }
}

// =============================================================================
// Space-time
// =============================================================================

/// Planar projection with elapsed time as a third axis.
#[derive(Debug, Clone, Copy)]
pub struct SpaceTime {
    origin: DateTime<Utc>,
    average_speed: f64,
}

impl SpaceTime {
    /// Measure time from `origin`, scaled by `average_speed` (m/s).
    pub fn new(origin: DateTime<Utc>, average_speed: f64) -> Result<Self, ReduceError> {
        if !average_speed.is_finite() || average_speed < 0.0 {
            return Err(ReduceError::InvalidAverageSpeed {
                speed: average_speed,
            });
        }
        Ok(Self {
            origin,
            average_speed,
        })
    }

    /// Measure time from the first point of `points`.
    pub fn for_track(points: &[TrackPoint], average_speed: f64) -> Result<Self, ReduceError> {
        let first = points
            .first()
            .ok_or(ReduceError::TooFewPoints { count: 0 })?;
        let origin = first.time.ok_or(ReduceError::MissingTimestamp { index: 0 })?;
        Self::new(origin, average_speed)
    }

    pub fn average_speed(&self) -> f64 {
        self.average_speed
    }

    /// Scaled time axis for a timestamp.
    fn time_axis(&self, time: DateTime<Utc>) -> f64 {
        elapsed_seconds(self.origin, time) * self.average_speed / EARTH_RADIUS_M
    }
}

impl Projector for SpaceTime {
    type Coord = [f64; 3];
    const METRIC: Metric = Metric::Squared;

    fn project(&self, point: &TrackPoint, index: usize) -> Result<[f64; 3], ReduceError> {
        check_geographic(point, index)?;
        let time = point.time.ok_or(ReduceError::MissingTimestamp { index })?;
        let (x, y) = mercator(point);
        Ok([x, y, self.time_axis(time)])
    }
}

// =============================================================================
// Ellipsoidal
// =============================================================================

/// Earth-centered, earth-fixed coordinates on the WGS84 ellipsoid (meters).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ellipsoidal;

impl Ellipsoidal {
    /// Geodetic to ECEF. Angles in degrees, height in meters.
    pub fn to_ecef(latitude: f64, longitude: f64, height: f64) -> [f64; 3] {
        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        let (sin_lng, cos_lng) = longitude.to_radians().sin_cos();

        let n = EARTH_RADIUS_M / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

        [
            (n + height) * cos_lat * cos_lng,
            (n + height) * cos_lat * sin_lng,
            (n * (1.0 - WGS84_E2) + height) * sin_lat,
        ]
    }
}

impl Projector for Ellipsoidal {
    type Coord = [f64; 3];
    const METRIC: Metric = Metric::Squared;

    fn project(&self, point: &TrackPoint, index: usize) -> Result<[f64; 3], ReduceError> {
        check_geographic(point, index)?;
        let height = point.elevation.unwrap_or(0.0);
        if !height.is_finite() {
            return Err(ReduceError::InvalidCoordinate { index });
        }
        Ok(Self::to_ecef(point.latitude, point.longitude, height))
    }
}

//! Marker observations
//!
//! What the simulated camera reports: marker identity, a polar position
//! relative to the observer, the requested resolution and the capture time.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grab::Pose;
use crate::{angle_within, cartesian_to_polar};

/// Kind of object a marker is stuck to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerType {
    Arena,
    Robot,
    TokenA,
    TokenB,
    TokenC,
}

impl MarkerType {
    /// First marker code of each type's range
    pub fn base_code(&self) -> u32 {
        match self {
            MarkerType::Arena => 0,
            MarkerType::Robot => 28,
            MarkerType::TokenA => 32,
            MarkerType::TokenB => 40,
            MarkerType::TokenC => 52,
        }
    }

    /// Printed marker size (metres)
    pub fn size(&self) -> f32 {
        match self {
            MarkerType::Arena | MarkerType::Robot => 0.25,
            MarkerType::TokenA | MarkerType::TokenB | MarkerType::TokenC => 0.1,
        }
    }
}

/// Identity of a visible marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerInfo {
    pub code: u32,
    pub marker_type: MarkerType,
    /// Index within its type
    pub offset: u32,
    pub size: f32,
}

impl MarkerInfo {
    pub fn new(marker_type: MarkerType, offset: u32) -> Self {
        Self {
            code: marker_type.base_code() + offset,
            marker_type,
            offset,
            size: marker_type.size(),
        }
    }
}

/// Polar position relative to the observer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoord {
    /// Distance (metres)
    pub length: f32,
    /// Bearing from the observer's heading (degrees, counter-clockwise positive)
    pub rot_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub polar: PolarCoord,
}

/// One marker seen by one `see()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub info: MarkerInfo,
    pub centre: Point,
    pub res: (u32, u32),
    /// Seconds since the Unix epoch, shared by every marker of the call
    pub timestamp: f64,
}

/// Capture time for a `see()` call
pub fn acquisition_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Field-of-view test: bearing strictly inside `±half_fov`
#[inline]
pub fn in_field_of_view(observer: &Pose, target: Vec2, half_fov: f32) -> bool {
    angle_within(observer.relative_bearing(target), half_fov)
}

/// Polar position of `target` in the observer's frame
pub fn relative_polar(observer: &Pose, target: Vec2) -> PolarCoord {
    let (length, _) = cartesian_to_polar(observer.offset_to(target));
    PolarCoord {
        length,
        rot_y: observer.relative_bearing(target).to_degrees(),
    }
}

impl Marker {
    /// Build the observation of `info` at `target` seen from `observer`
    pub fn observe(
        observer: &Pose,
        info: MarkerInfo,
        target: Vec2,
        res: (u32, u32),
        timestamp: f64,
    ) -> Self {
        Self {
            info,
            centre: Point {
                polar: relative_polar(observer, target),
            },
            res,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

    fn origin() -> Pose {
        Pose {
            location: Vec2::ZERO,
            heading: 0.0,
        }
    }

    #[test]
    fn test_marker_codes() {
        let info = MarkerInfo::new(MarkerType::TokenB, 3);
        assert_eq!(info.code, 43);
        assert_eq!(info.size, 0.1);
        assert_eq!(MarkerInfo::new(MarkerType::Arena, 5).code, 5);
    }

    #[test]
    fn test_relative_polar_dead_ahead() {
        let polar = relative_polar(&origin(), Vec2::new(1.0, 0.0));
        assert!((polar.length - 1.0).abs() < 1e-6);
        assert!(polar.rot_y.abs() < 1e-6);
    }

    #[test]
    fn test_relative_polar_uses_heading() {
        let observer = Pose {
            location: Vec2::new(1.0, 1.0),
            heading: FRAC_PI_2,
        };
        let polar = relative_polar(&observer, Vec2::new(0.0, 1.0));
        assert!((polar.length - 1.0).abs() < 1e-6);
        assert!((polar.rot_y - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_field_of_view() {
        assert!(in_field_of_view(&origin(), Vec2::new(1.0, 0.1), FRAC_PI_6));
        assert!(!in_field_of_view(&origin(), Vec2::new(0.0, 1.0), FRAC_PI_6));
        assert!(!in_field_of_view(&origin(), Vec2::new(-1.0, 0.0), FRAC_PI_6));
    }

    #[test]
    fn test_field_of_view_behind_a_turned_observer() {
        let observer = Pose {
            location: Vec2::ZERO,
            heading: PI,
        };
        // Slightly clockwise of dead ahead: atan2 gives ~-π, raw offset ~-2π
        assert!(!in_field_of_view(&observer, Vec2::new(-1.0, -0.05), FRAC_PI_6));
        assert!(in_field_of_view(&observer, Vec2::new(-1.0, 0.05), FRAC_PI_6));

        let polar = relative_polar(&observer, Vec2::new(-1.0, 0.0));
        assert!(polar.rot_y.abs() < 1e-3);
        let polar = relative_polar(&observer, Vec2::new(-1.0, -0.05));
        assert!(polar.rot_y < -350.0);
    }

    #[test]
    fn test_acquisition_time_is_recent() {
        // 2020-01-01
        assert!(acquisition_time() > 1_577_836_800.0);
    }
}

//! Grab sector geometry
//!
//! A grab sector is the wedge ahead of a robot: everything within `radius`
//! of its centre whose bearing is strictly inside `±half_width` of its
//! heading. Evaluated against a live pose, never stored.

use glam::Vec2;

use crate::{angle_within, cartesian_to_polar};

/// A robot's pose as seen by the manipulation and vision models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub location: Vec2,
    pub heading: f32,
}

impl Pose {
    /// Vector from this pose to `target`, in world axes
    #[inline]
    pub fn offset_to(&self, target: Vec2) -> Vec2 {
        target - self.location
    }

    /// Bearing of `target` minus the heading, not wrapped
    ///
    /// The bearing is in [-π, π]; the heading is whatever the body has
    /// accumulated. A target just across ±π from the heading gives an offset
    /// near ±2π.
    #[inline]
    pub fn relative_bearing(&self, target: Vec2) -> f32 {
        let (_, direction) = cartesian_to_polar(self.offset_to(target));
        direction - self.heading
    }
}

/// Radius + half-angle wedge ahead of a pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabSector {
    pub radius: f32,
    pub half_width: f32,
}

impl GrabSector {
    pub fn new(radius: f32, half_width: f32) -> Self {
        Self { radius, half_width }
    }

    /// Distance is inclusive; the angular edge is exclusive
    pub fn contains(&self, pose: &Pose, target: Vec2) -> bool {
        pose.offset_to(target).length() <= self.radius
            && angle_within(pose.relative_bearing(target), self.half_width)
    }
}

/// Where a held object sits: `offset` straight ahead of the pose
#[inline]
pub fn grabber_point(pose: &Pose, offset: f32) -> Vec2 {
    Vec2::new(
        pose.location.x + pose.heading.cos() * offset,
        pose.location.y + pose.heading.sin() * offset,
    )
}

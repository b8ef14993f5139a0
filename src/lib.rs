//! Arena Sim - simulation kernel for a robot-competition sandbox
//!
//! Core modules:
//! - `sim`: Robots, tokens, arena container and the physics substrate
//! - `settings`: Tunable constants, loadable from JSON
//! - `error`: Error type shared by every fallible operation

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::SimSettings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Motor power is clamped to ±this value
    pub const MAX_MOTOR_SPEED: f32 = 100.0;
    /// Newtons of wheel force per unit of motor power
    pub const FORCE_SCALE: f32 = 0.4;

    /// Grabber reach (metres)
    pub const GRAB_RADIUS: f32 = 0.4;
    /// Half-angle of the grab sector (radians)
    pub const HALF_GRAB_SECTOR_WIDTH: f32 = PI / 4.0;
    /// Distance in front of the robot centre where a held object sits
    pub const GRABBER_OFFSET: f32 = 0.25;

    /// Half-angle of the camera's field of view (radians)
    pub const HALF_FOV_WIDTH: f32 = PI / 6.0;
    /// Any channel above this power blurs the camera
    pub const MOTION_BLUR_POWER_THRESHOLD: f32 = 5.0;
    /// Default camera resolution
    pub const DEFAULT_RESOLUTION: (u32, u32) = (800, 600);

    /// Robot chassis (square, metres)
    pub const ROBOT_WIDTH: f32 = 0.48;
    pub const ROBOT_LINEAR_DAMPING: f32 = 0.99;
    pub const ROBOT_ANGULAR_DAMPING: f32 = 0.96;
    /// MDF at 12cm thickness
    pub const ROBOT_DENSITY: f32 = 500.0 * 0.12;

    /// Token defaults
    pub const TOKEN_WIDTH: f32 = 0.1;
    pub const TOKEN_DAMPING: f32 = 10.0;
    pub const TOKEN_DENSITY: f32 = 1.0;
}

/// True when `offset` lies strictly inside `(-half_width, half_width)`
#[inline]
pub fn angle_within(offset: f32, half_width: f32) -> bool {
    -half_width < offset && offset < half_width
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

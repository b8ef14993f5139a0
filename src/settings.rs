//! Simulation settings
//!
//! Every physical constant the kernel depends on lives here so arenas can be
//! tuned without recompiling. Persisted as JSON; missing fields fall back to
//! the values in [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    // === Actuation ===
    /// Motor power is clamped to ±this value
    pub max_motor_speed: f32,
    /// Wheel force per unit of motor power
    pub force_scale: f32,

    // === Manipulation ===
    pub grab_radius: f32,
    /// Half-angle of the grab sector (radians)
    pub half_grab_sector_width: f32,
    /// Distance ahead of the robot centre where held objects are placed
    pub grabber_offset: f32,

    // === Perception ===
    /// Half-angle of the field of view (radians)
    pub half_fov_width: f32,
    pub motion_blur_power_threshold: f32,
    pub default_resolution: (u32, u32),

    // === Bodies ===
    pub robot_width: f32,
    pub robot_linear_damping: f32,
    pub robot_angular_damping: f32,
    pub robot_density: f32,
    pub token_width: f32,
    pub token_damping: f32,
    pub token_density: f32,

    // === Stepping ===
    /// Fixed timestep (seconds)
    pub sim_dt: f32,
    pub max_substeps: u32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            max_motor_speed: MAX_MOTOR_SPEED,
            force_scale: FORCE_SCALE,

            grab_radius: GRAB_RADIUS,
            half_grab_sector_width: HALF_GRAB_SECTOR_WIDTH,
            grabber_offset: GRABBER_OFFSET,

            half_fov_width: HALF_FOV_WIDTH,
            motion_blur_power_threshold: MOTION_BLUR_POWER_THRESHOLD,
            default_resolution: DEFAULT_RESOLUTION,

            robot_width: ROBOT_WIDTH,
            robot_linear_damping: ROBOT_LINEAR_DAMPING,
            robot_angular_damping: ROBOT_ANGULAR_DAMPING,
            robot_density: ROBOT_DENSITY,
            token_width: TOKEN_WIDTH,
            token_damping: TOKEN_DAMPING,
            token_density: TOKEN_DENSITY,

            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl SimSettings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the kernel cannot work with
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("max_motor_speed", self.max_motor_speed),
            ("grab_radius", self.grab_radius),
            ("half_grab_sector_width", self.half_grab_sector_width),
            ("half_fov_width", self.half_fov_width),
            ("robot_width", self.robot_width),
            ("robot_density", self.robot_density),
            ("token_width", self.token_width),
            ("token_density", self.token_density),
            ("sim_dt", self.sim_dt),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidSetting {
                    field,
                    message: format!("{value} (must be finite and > 0)"),
                });
            }
        }

        let non_negative = [
            ("force_scale", self.force_scale),
            ("grabber_offset", self.grabber_offset),
            ("motion_blur_power_threshold", self.motion_blur_power_threshold),
            ("robot_linear_damping", self.robot_linear_damping),
            ("robot_angular_damping", self.robot_angular_damping),
            ("token_damping", self.token_damping),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidSetting {
                    field,
                    message: format!("{value} (must be finite and >= 0)"),
                });
            }
        }

        if self.max_substeps == 0 {
            return Err(SimError::InvalidSetting {
                field: "max_substeps",
                message: "must be >= 1".into(),
            });
        }
        Ok(())
    }
}

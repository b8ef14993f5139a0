//! Motor boards and channels
//!
//! Plain value types: the owning robot guards them with its own lock, so a
//! channel never synchronizes by itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serial number reported by every simulated board
pub const SIM_BOARD_SERIAL: &str = "SIM_MBv4";

/// Which channel of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Left wheel
    M0,
    /// Right wheel
    M1,
}

/// A single clamped motor power
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorChannel {
    power: f32,
}

impl MotorChannel {
    #[inline]
    pub fn power(&self) -> f32 {
        self.power
    }

    /// Store `value` clamped into `[-max, max]`. NaN stores zero.
    pub fn set_power(&mut self, value: f32, max: f32) {
        self.power = if value.is_nan() { 0.0 } else { value.clamp(-max, max) };
    }
}

/// A motor board with two channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorBoard {
    pub serialnum: String,
    pub m0: MotorChannel,
    pub m1: MotorChannel,
}

impl Default for MotorBoard {
    fn default() -> Self {
        Self {
            serialnum: SIM_BOARD_SERIAL.to_string(),
            m0: MotorChannel::default(),
            m1: MotorChannel::default(),
        }
    }
}

impl MotorBoard {
    pub fn channel(&self, channel: Channel) -> &MotorChannel {
        match channel {
            Channel::M0 => &self.m0,
            Channel::M1 => &self.m1,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut MotorChannel {
        match channel {
            Channel::M0 => &mut self.m0,
            Channel::M1 => &mut self.m1,
        }
    }

    /// True if either channel's magnitude is strictly above `threshold`
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.m0.power().abs() > threshold || self.m1.power().abs() > threshold
    }
}

impl fmt::Display for MotorBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Motor( serialnum = \"{}\" ) (Simulated Motor Board v4)",
            self.serialnum
        )
    }
}

/// True if any channel on any board exceeds `threshold`
pub fn any_exceeds(boards: &[MotorBoard], threshold: f32) -> bool {
    boards.iter().any(|board| board.exceeds(threshold))
}

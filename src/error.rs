//! Error type for the simulation kernel

use thiserror::Error;

use crate::sim::physics::BodyHandle;

/// Errors raised by the simulation kernel.
#[derive(Debug, Error)]
pub enum SimError {
    /// `grab()` called while the robot already holds something.
    #[error("The robot is already holding something.")]
    AlreadyHolding,

    #[error("Invalid body definition: {0}")]
    InvalidBody(String),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Unknown body handle: {0:?}")]
    UnknownBody(BodyHandle),

    #[error("Invalid value for {field}: {message}")]
    InvalidSetting { field: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_holding_message() {
        assert_eq!(
            SimError::AlreadyHolding.to_string(),
            "The robot is already holding something."
        );
    }

    #[test]
    fn invalid_setting_message() {
        let err = SimError::InvalidSetting {
            field: "grab_radius",
            message: "must be > 0".into(),
        };
        assert_eq!(err.to_string(), "Invalid value for grab_radius: must be > 0");
    }
}

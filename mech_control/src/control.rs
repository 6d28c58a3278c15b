//! Control engine root.
//!
//! Feedforward + PID feedback, summed and clamped to the battery voltage by
//! the [`output::MotionController`]. Trapezoidal profiles generate the
//! commanded state for position moves.

use serde::{Deserialize, Serialize};

pub mod feedforward;
pub mod output;
pub mod pid;
pub mod profile;

/// Commanded or measured motion of a single-degree-of-freedom mechanism.
///
/// Units: m, m/s, m/s² for the elevator; the flywheel only uses `velocity`
/// (rad/s) and `acceleration` (rad/s²).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub position: f64,
    pub velocity: f64,
    #[serde(default)]
    pub acceleration: f64,
}

impl MotionState {
    pub const fn new(position: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    /// At rest at `position`.
    pub const fn at(position: f64) -> Self {
        Self::new(position, 0.0, 0.0)
    }

    /// Spinning at a constant `velocity`.
    pub const fn spinning(velocity: f64) -> Self {
        Self::new(0.0, velocity, 0.0)
    }

    /// Returns true if all fields are finite (not NaN, not Inf).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }
}

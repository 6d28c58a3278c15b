//! Common re-exports.
//!
//! ```rust
//! use mech_common::prelude::*;
//! ```

pub use crate::config::{ConfigError, ConfigLoader};
pub use crate::consts::{DT, GRAVITY, NOMINAL_BATTERY_VOLTAGE};
pub use crate::gains::{ControlMode, FeedforwardGains, GainSet, MechanismGains, PidGains};
pub use crate::mechanism::{MechanismConfig, MechanismFile, MechanismKind, MotionConstraints};
pub use crate::motor::DcMotor;
pub use crate::presets;

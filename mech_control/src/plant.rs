//! Plant models.
//!
//! A plant maps the applied voltage to the mechanism's next state. Both
//! variants are linear state-space systems discretized with a zero-order hold
//! at the loop period:
//!
//! - [`ElevatorPlant`]: position + velocity, gravity, hard stops at the
//!   configured travel bounds.
//! - [`FlywheelPlant`]: velocity only, unbounded.
//!
//! Each can be built from the motor physics or from the identified
//! feedforward characterization (kV, kA, kG).

use mech_common::config::ConfigError;
use mech_common::gains::FeedforwardGains;
use mech_common::mechanism::{MechanismConfig, MechanismKind};
use serde::{Deserialize, Serialize};

use crate::control::MotionState;

pub mod elevator;
pub mod flywheel;
pub mod linear;

pub use elevator::ElevatorPlant;
pub use flywheel::FlywheelPlant;

/// Hard stop reached during a simulation step.
///
/// Informational: position was clamped and velocity forced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryEvent {
    /// Clamped to the minimum height.
    Lower,
    /// Clamped to the maximum height.
    Upper,
}

/// Outcome of one plant step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// State after the step.
    pub state: MotionState,
    /// Voltage actually integrated (after the supply clamp) [V].
    pub applied_voltage: f64,
    /// Motor current drawn during the step [A].
    pub current: f64,
    /// Set when a travel bound was hit.
    pub boundary: Option<BoundaryEvent>,
}

/// Where the continuous model's coefficients come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Derived from motor constants, gearing, radius and mass / inertia.
    Physics,
    /// Identified from the feedforward gains (kV, kA and kG).
    #[default]
    Characterized,
}

/// A simulated mechanism.
pub trait Plant: Send {
    /// Hold `voltage` for `dt` seconds and advance the state.
    ///
    /// A non-positive or non-finite `dt` leaves the state unchanged.
    fn step(&mut self, voltage: f64, dt: f64) -> StepReport;

    /// Current state.
    fn state(&self) -> MotionState;

    /// Overwrite the state (clamped to the travel bounds where applicable).
    fn set_state(&mut self, state: MotionState);

    fn kind(&self) -> MechanismKind;
}

/// Build the plant matching `config.kind`.
///
/// # Errors
///
/// `ConfigError::ValidationError` for an invalid mechanism description, or
/// when a characterized model is requested with non-positive kA or negative kV.
pub fn build(
    config: &MechanismConfig,
    source: ModelSource,
    feedforward: &FeedforwardGains,
) -> Result<Box<dyn Plant>, ConfigError> {
    Ok(match (config.kind, source) {
        (MechanismKind::Elevator, ModelSource::Physics) => {
            Box::new(ElevatorPlant::from_physics(config)?)
        }
        (MechanismKind::Elevator, ModelSource::Characterized) => {
            Box::new(ElevatorPlant::from_characterization(config, feedforward)?)
        }
        (MechanismKind::Flywheel, ModelSource::Physics) => {
            Box::new(FlywheelPlant::from_physics(config)?)
        }
        (MechanismKind::Flywheel, ModelSource::Characterized) => {
            Box::new(FlywheelPlant::from_characterization(config, feedforward)?)
        }
    })
}

/// Clamp the commanded voltage to the supply; NaN becomes 0 V.
#[inline]
pub(crate) fn supply_clamp(voltage: f64, battery_voltage: f64) -> f64 {
    if voltage.is_nan() {
        0.0
    } else {
        voltage.clamp(-battery_voltage, battery_voltage)
    }
}

#[inline]
pub(crate) fn valid_dt(dt: f64) -> bool {
    dt > 0.0 && dt.is_finite()
}

/// Reject kind mismatches and characterizations that have no plant.
pub(crate) fn check_source(
    config: &MechanismConfig,
    expected: MechanismKind,
    feedforward: Option<&FeedforwardGains>,
) -> Result<(), ConfigError> {
    if config.kind != expected {
        return Err(ConfigError::ValidationError(format!(
            "cannot build a {expected} plant from a {} config",
            config.kind
        )));
    }
    config.validate()?;
    if let Some(ff) = feedforward {
        if !(ff.ka > 0.0 && ff.ka.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "characterized plant needs kA > 0 (got {})",
                ff.ka
            )));
        }
        if !(ff.kv >= 0.0 && ff.kv.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "characterized plant needs kV >= 0 (got {})",
                ff.kv
            )));
        }
        if !ff.kg.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "characterized plant needs finite kG (got {})",
                ff.kg
            )));
        }
    }
    Ok(())
}

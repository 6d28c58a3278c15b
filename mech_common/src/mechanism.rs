//! Mechanism description: the immutable physical constants of one
//! single-degree-of-freedom mechanism.
//!
//! [`MechanismKind`] selects which plant, feedforward shape and control modes
//! apply. A [`MechanismConfig`] is built once at startup (from a preset or a
//! TOML file), validated, and then shared by reference with every component.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, require_positive};
use crate::consts::NOMINAL_BATTERY_VOLTAGE;
use crate::gains::{ControlMode, MechanismGains};
use crate::motor::DcMotor;

/// Mechanism variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MechanismKind {
    /// Carriage lifted by a cable drum. Position + velocity state, gravity
    /// acts along the axis, travel is bounded.
    Elevator,
    /// Spinning inertia. Velocity state only, no gravity, unbounded.
    Flywheel,
}

impl MechanismKind {
    /// Whether a feedback loop of `mode` makes sense for this mechanism.
    #[inline]
    pub fn supports(self, mode: ControlMode) -> bool {
        match self {
            Self::Elevator => true,
            Self::Flywheel => mode == ControlMode::Velocity,
        }
    }
}

impl std::fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Elevator => write!(f, "elevator"),
            Self::Flywheel => write!(f, "flywheel"),
        }
    }
}

/// Velocity / acceleration limits for generated motion profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConstraints {
    /// Maximum cruise velocity [unit/s].
    pub max_velocity: f64,
    /// Maximum acceleration [unit/s²].
    pub max_acceleration: f64,
}

/// Immutable physical description of a mechanism.
///
/// Units: meters for the elevator, radians for the flywheel.
///
/// # TOML Example
///
/// ```toml
/// [mechanism]
/// name = "elevator"
/// kind = "elevator"
/// gearing = 0.01
/// mass = 22.68
/// drum_radius = 0.0254
/// min_height = 0.127
/// max_height = 2.286
///
/// [mechanism.motor]
/// stall_torque = 0.97
/// stall_current = 100.0
/// free_current = 1.4
/// free_speed = 1151.9
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismConfig {
    /// Human-readable identifier used in logs.
    pub name: String,
    pub kind: MechanismKind,
    pub motor: DcMotor,
    /// Motor rotations per output rotation.
    pub gearing: f64,
    /// Carriage mass [kg] (elevator).
    #[serde(default)]
    pub mass: f64,
    /// Drum radius [m] (elevator).
    #[serde(default)]
    pub drum_radius: f64,
    /// Moment of inertia [kg·m²] (flywheel).
    #[serde(default)]
    pub moment_of_inertia: f64,
    /// Lowest carriage height [m] (elevator).
    #[serde(default)]
    pub min_height: f64,
    /// Highest carriage height [m] (elevator).
    #[serde(default)]
    pub max_height: f64,
    /// Output distance per encoder count. `None` means an ideal sensor.
    #[serde(default)]
    pub encoder_multiplier: Option<f64>,
    /// Profile limits. `None` means set-points are applied as steps.
    #[serde(default)]
    pub constraints: Option<MotionConstraints>,
    /// Supply voltage; output commands are clamped to ±this [V].
    #[serde(default = "default_battery_voltage")]
    pub battery_voltage: f64,
}

fn default_battery_voltage() -> f64 {
    NOMINAL_BATTERY_VOLTAGE
}

impl MechanismConfig {
    /// Validate the physical constants for the configured kind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `name` is empty
    /// - gearing, battery voltage or the motor datasheet are non-physical
    /// - elevator: mass or drum radius ≤ 0, or `min_height >= max_height`
    /// - flywheel: moment of inertia ≤ 0
    /// - an encoder multiplier or profile constraint is ≤ 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "mechanism.name cannot be empty".to_string(),
            ));
        }
        require_positive("mechanism.gearing", self.gearing)?;
        require_positive("mechanism.battery_voltage", self.battery_voltage)?;
        self.motor.validate()?;

        match self.kind {
            MechanismKind::Elevator => {
                require_positive("mechanism.mass", self.mass)?;
                require_positive("mechanism.drum_radius", self.drum_radius)?;
                if !self.min_height.is_finite() || !self.max_height.is_finite() {
                    return Err(ConfigError::ValidationError(
                        "mechanism height bounds must be finite".to_string(),
                    ));
                }
                if self.min_height >= self.max_height {
                    return Err(ConfigError::ValidationError(format!(
                        "mechanism.min_height ({}) must be below max_height ({})",
                        self.min_height, self.max_height
                    )));
                }
            }
            MechanismKind::Flywheel => {
                require_positive("mechanism.moment_of_inertia", self.moment_of_inertia)?;
            }
        }

        if let Some(m) = self.encoder_multiplier {
            require_positive("mechanism.encoder_multiplier", m)?;
        }
        if let Some(c) = &self.constraints {
            require_positive("mechanism.constraints.max_velocity", c.max_velocity)?;
            require_positive("mechanism.constraints.max_acceleration", c.max_acceleration)?;
        }
        Ok(())
    }

    /// Travel bounds for bounded mechanisms.
    #[inline]
    pub fn height_bounds(&self) -> Option<(f64, f64)> {
        match self.kind {
            MechanismKind::Elevator => Some((self.min_height, self.max_height)),
            MechanismKind::Flywheel => None,
        }
    }

    /// Convert an output position to whole encoder counts (nearest).
    ///
    /// With no encoder multiplier the sensor is ideal and one count is one
    /// output unit.
    #[inline]
    pub fn position_to_counts(&self, position: f64) -> i64 {
        let per_count = self.encoder_multiplier.unwrap_or(1.0);
        (position / per_count).round() as i64
    }

    /// Convert encoder counts back to an output position.
    #[inline]
    pub fn counts_to_position(&self, counts: i64) -> f64 {
        counts as f64 * self.encoder_multiplier.unwrap_or(1.0)
    }

    /// Position as the encoder would report it.
    #[inline]
    pub fn quantize_position(&self, position: f64) -> f64 {
        match self.encoder_multiplier {
            Some(_) => self.counts_to_position(self.position_to_counts(position)),
            None => position,
        }
    }
}

/// Top-level layout of a mechanism TOML file.
///
/// ```toml
/// mode = "position"
///
/// [mechanism]
/// # see MechanismConfig
///
/// [gains.feedforward]
/// ks = 0.01
/// kg = 1.3
/// kv = 0.5
/// ka = 0.1
///
/// [gains.position]
/// kp = 1.0
/// kd = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismFile {
    pub mechanism: MechanismConfig,
    pub gains: MechanismGains,
    /// Loop to run at startup.
    #[serde(default)]
    pub mode: ControlMode,
}

impl MechanismFile {
    /// Validate the physical description and the startup mode.
    ///
    /// Gains are *not* checked here: an uncharacterized mechanism still
    /// loads, and the controller reports and fails closed at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mechanism.validate()?;
        if !self.mechanism.kind.supports(self.mode) {
            return Err(ConfigError::ValidationError(format!(
                "{} does not support {:?} control",
                self.mechanism.kind, self.mode
            )));
        }
        Ok(())
    }
}

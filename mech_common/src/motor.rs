//! DC motor characteristics.
//!
//! A brushed/brushless DC motor is modelled by its datasheet curve: stall
//! torque and current, free speed and free current at a nominal voltage.
//! Resistance, velocity constant and torque constant are derived from those.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, require_positive};
use crate::consts::{NOMINAL_BATTERY_VOLTAGE, rpm_to_rad_per_sec};

/// Datasheet description of one or more identical motors on a gearbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcMotor {
    /// Voltage at which the datasheet values were measured [V].
    #[serde(default = "default_nominal_voltage")]
    pub nominal_voltage: f64,
    /// Stall torque of a single motor [N·m].
    pub stall_torque: f64,
    /// Stall current of a single motor [A].
    pub stall_current: f64,
    /// Free-running current of a single motor [A].
    pub free_current: f64,
    /// Free speed [rad/s].
    pub free_speed: f64,
    /// Number of motors driving the gearbox.
    #[serde(default = "default_motor_count")]
    pub count: u32,
}

fn default_nominal_voltage() -> f64 {
    NOMINAL_BATTERY_VOLTAGE
}

fn default_motor_count() -> u32 {
    1
}

impl DcMotor {
    /// REV NEO 550.
    pub fn neo550(count: u32) -> Self {
        Self {
            nominal_voltage: 12.0,
            stall_torque: 0.97,
            stall_current: 100.0,
            free_current: 1.4,
            free_speed: rpm_to_rad_per_sec(11_000.0),
            count,
        }
    }

    /// REV NEO.
    pub fn neo(count: u32) -> Self {
        Self {
            nominal_voltage: 12.0,
            stall_torque: 2.6,
            stall_current: 105.0,
            free_current: 1.8,
            free_speed: rpm_to_rad_per_sec(5676.0),
            count,
        }
    }

    /// Combined stall torque of all motors [N·m].
    #[inline]
    fn total_stall_torque(&self) -> f64 {
        self.stall_torque * f64::from(self.count)
    }

    /// Combined stall current of all motors [A].
    #[inline]
    fn total_stall_current(&self) -> f64 {
        self.stall_current * f64::from(self.count)
    }

    /// Winding resistance of the motor bank [Ω].
    #[inline]
    pub fn resistance(&self) -> f64 {
        self.nominal_voltage / self.total_stall_current()
    }

    /// Velocity constant [rad/s per V].
    #[inline]
    pub fn kv(&self) -> f64 {
        let free_current = self.free_current * f64::from(self.count);
        self.free_speed / (self.nominal_voltage - self.resistance() * free_current)
    }

    /// Torque constant [N·m per A].
    #[inline]
    pub fn kt(&self) -> f64 {
        self.total_stall_torque() / self.total_stall_current()
    }

    /// Current drawn at a given motor speed [rad/s] and applied voltage [V].
    #[inline]
    pub fn current(&self, speed: f64, voltage: f64) -> f64 {
        -speed / (self.kv() * self.resistance()) + voltage / self.resistance()
    }

    /// Torque produced at a given current [A].
    #[inline]
    pub fn torque(&self, current: f64) -> f64 {
        self.kt() * current
    }

    /// Reject datasheets that would produce a singular or unphysical model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("motor.nominal_voltage", self.nominal_voltage)?;
        require_positive("motor.stall_torque", self.stall_torque)?;
        require_positive("motor.stall_current", self.stall_current)?;
        require_positive("motor.free_speed", self.free_speed)?;
        if !self.free_current.is_finite() || self.free_current < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "motor.free_current must be finite and >= 0 (got {})",
                self.free_current
            )));
        }
        if self.count == 0 {
            return Err(ConfigError::ValidationError(
                "motor.count must be at least 1".to_string(),
            ));
        }
        if self.free_current >= self.stall_current {
            return Err(ConfigError::ValidationError(
                "motor.free_current must be below motor.stall_current".to_string(),
            ));
        }
        Ok(())
    }
}

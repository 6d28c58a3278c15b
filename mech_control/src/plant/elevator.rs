//! Elevator plant: carriage on a cable drum.
//!
//! State `x = [position, velocity]`. Physics model for gearing `G` (motor
//! rotations per drum rotation), drum radius `r`, carriage mass `m`:
//!
//! ```text
//! A = [[0, 1], [0, −G²·Kt / (R·r²·m·Kv)]]
//! B = [0, G·Kt / (R·r·m)]
//! c = [0, −g]
//! ```
//!
//! Characterized model: `A22 = −kV/kA`, `B2 = 1/kA`, `c2 = −kG/kA`.
//!
//! Position is clamped to `[min_height, max_height]`; velocity is zeroed at
//! the stop and the step reports a [`BoundaryEvent`].

use mech_common::config::ConfigError;
use mech_common::consts::GRAVITY;
use mech_common::gains::FeedforwardGains;
use mech_common::mechanism::{MechanismConfig, MechanismKind};
use mech_common::motor::DcMotor;
use nalgebra::{Matrix2, Vector2};
use tracing::trace;

use super::linear::{Discretized, LinearSystem};
use super::{BoundaryEvent, Plant, StepReport, check_source, supply_clamp, valid_dt};
use crate::control::MotionState;

/// Simulated elevator.
#[derive(Debug, Clone)]
pub struct ElevatorPlant {
    model: Discretized<2>,
    motor: DcMotor,
    gearing: f64,
    drum_radius: f64,
    min_height: f64,
    max_height: f64,
    battery_voltage: f64,
    /// `[position, velocity]`.
    x: Vector2<f64>,
    acceleration: f64,
}

impl ElevatorPlant {
    /// Physics model from the motor datasheet, gearing, drum radius and mass.
    pub fn from_physics(config: &MechanismConfig) -> Result<Self, ConfigError> {
        check_source(config, MechanismKind::Elevator, None)?;
        let motor = config.motor;
        let g = config.gearing;
        let r = config.drum_radius;
        let m = config.mass;

        let a22 = -(g * g * motor.kt()) / (motor.resistance() * r * r * m * motor.kv());
        let b2 = g * motor.kt() / (motor.resistance() * r * m);

        Ok(Self::with_system(
            config,
            LinearSystem::new(
                Matrix2::new(0.0, 1.0, 0.0, a22),
                Vector2::new(0.0, b2),
                Vector2::new(0.0, -GRAVITY),
            ),
        ))
    }

    /// Identified model from the feedforward characterization.
    pub fn from_characterization(
        config: &MechanismConfig,
        feedforward: &FeedforwardGains,
    ) -> Result<Self, ConfigError> {
        check_source(config, MechanismKind::Elevator, Some(feedforward))?;
        let ka = feedforward.ka;

        Ok(Self::with_system(
            config,
            LinearSystem::new(
                Matrix2::new(0.0, 1.0, 0.0, -feedforward.kv / ka),
                Vector2::new(0.0, 1.0 / ka),
                Vector2::new(0.0, -feedforward.kg / ka),
            ),
        ))
    }

    fn with_system(config: &MechanismConfig, system: LinearSystem<2>) -> Self {
        Self {
            model: Discretized::new(system),
            motor: config.motor,
            gearing: config.gearing,
            drum_radius: config.drum_radius,
            min_height: config.min_height,
            max_height: config.max_height,
            battery_voltage: config.battery_voltage,
            x: Vector2::new(config.min_height, 0.0),
            acceleration: 0.0,
        }
    }

    /// Continuous model in use.
    #[inline]
    pub fn system(&self) -> &LinearSystem<2> {
        self.model.system()
    }

    /// Travel bounds `(min, max)` [m].
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_height, self.max_height)
    }

    /// Motor current at carriage velocity `velocity` under `voltage` [A].
    #[inline]
    pub fn current_draw(&self, voltage: f64, velocity: f64) -> f64 {
        let motor_speed = velocity * self.gearing / self.drum_radius;
        self.motor.current(motor_speed, voltage)
    }

    /// Clamp `x` into the travel bounds, zeroing velocity at a stop.
    fn enforce_bounds(&mut self) -> Option<BoundaryEvent> {
        if self.x[0] < self.min_height {
            self.x = Vector2::new(self.min_height, 0.0);
            Some(BoundaryEvent::Lower)
        } else if self.x[0] > self.max_height {
            self.x = Vector2::new(self.max_height, 0.0);
            Some(BoundaryEvent::Upper)
        } else {
            None
        }
    }
}

impl Plant for ElevatorPlant {
    fn step(&mut self, voltage: f64, dt: f64) -> StepReport {
        let u = supply_clamp(voltage, self.battery_voltage);
        let current = self.current_draw(u, self.x[1]);

        if !valid_dt(dt) {
            return StepReport {
                state: self.state(),
                applied_voltage: u,
                current,
                boundary: None,
            };
        }

        let prev_velocity = self.x[1];
        self.x = self.model.at(dt).step(&self.x, u);
        let boundary = self.enforce_bounds();
        self.acceleration = (self.x[1] - prev_velocity) / dt;

        if let Some(event) = boundary {
            trace!(?event, position = self.x[0], "elevator at hard stop");
        }

        StepReport {
            state: self.state(),
            applied_voltage: u,
            current,
            boundary,
        }
    }

    fn state(&self) -> MotionState {
        MotionState::new(self.x[0], self.x[1], self.acceleration)
    }

    fn set_state(&mut self, state: MotionState) {
        self.x = Vector2::new(state.position, state.velocity);
        self.acceleration = 0.0;
        self.enforce_bounds();
    }

    fn kind(&self) -> MechanismKind {
        MechanismKind::Elevator
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

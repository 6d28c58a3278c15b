//! Flywheel plant: a spinning inertia with velocity as its only state.
//!
//! Physics model for gearing `G` and moment of inertia `J`:
//!
//! ```text
//! A = −G²·Kt / (R·Kv·J)
//! B = G·Kt / (R·J)
//! ```
//!
//! Characterized model: `A = −kV/kA`, `B = 1/kA`. No gravity, no bounds.

use mech_common::config::ConfigError;
use mech_common::gains::FeedforwardGains;
use mech_common::mechanism::{MechanismConfig, MechanismKind};
use mech_common::motor::DcMotor;
use nalgebra::{Matrix1, Vector1};

use super::linear::{Discretized, LinearSystem};
use super::{Plant, StepReport, check_source, supply_clamp, valid_dt};
use crate::control::MotionState;

/// Simulated flywheel.
#[derive(Debug, Clone)]
pub struct FlywheelPlant {
    model: Discretized<1>,
    motor: DcMotor,
    gearing: f64,
    battery_voltage: f64,
    velocity: f64,
    acceleration: f64,
}

impl FlywheelPlant {
    /// Physics model from the motor datasheet, gearing and inertia.
    pub fn from_physics(config: &MechanismConfig) -> Result<Self, ConfigError> {
        check_source(config, MechanismKind::Flywheel, None)?;
        let motor = config.motor;
        let g = config.gearing;
        let j = config.moment_of_inertia;

        let a = -(g * g * motor.kt()) / (motor.resistance() * motor.kv() * j);
        let b = g * motor.kt() / (motor.resistance() * j);

        Ok(Self::with_system(
            config,
            LinearSystem::new(Matrix1::new(a), Vector1::new(b), Vector1::zeros()),
        ))
    }

    /// Identified model from the feedforward characterization.
    pub fn from_characterization(
        config: &MechanismConfig,
        feedforward: &FeedforwardGains,
    ) -> Result<Self, ConfigError> {
        check_source(config, MechanismKind::Flywheel, Some(feedforward))?;
        let ka = feedforward.ka;

        Ok(Self::with_system(
            config,
            LinearSystem::new(
                Matrix1::new(-feedforward.kv / ka),
                Vector1::new(1.0 / ka),
                Vector1::zeros(),
            ),
        ))
    }

    fn with_system(config: &MechanismConfig, system: LinearSystem<1>) -> Self {
        Self {
            model: Discretized::new(system),
            motor: config.motor,
            gearing: config.gearing,
            battery_voltage: config.battery_voltage,
            velocity: 0.0,
            acceleration: 0.0,
        }
    }

    #[inline]
    pub fn system(&self) -> &LinearSystem<1> {
        self.model.system()
    }

    /// Motor current at wheel speed `velocity` under `voltage` [A].
    #[inline]
    pub fn current_draw(&self, voltage: f64, velocity: f64) -> f64 {
        self.motor.current(velocity * self.gearing, voltage)
    }
}

impl Plant for FlywheelPlant {
    fn step(&mut self, voltage: f64, dt: f64) -> StepReport {
        let u = supply_clamp(voltage, self.battery_voltage);
        let current = self.current_draw(u, self.velocity);

        if valid_dt(dt) {
            let prev = self.velocity;
            self.velocity = self.model.at(dt).step(&Vector1::new(prev), u)[0];
            self.acceleration = (self.velocity - prev) / dt;
        }

        StepReport {
            state: self.state(),
            applied_voltage: u,
            current,
            boundary: None,
        }
    }

    fn state(&self) -> MotionState {
        MotionState::new(0.0, self.velocity, self.acceleration)
    }

    fn set_state(&mut self, state: MotionState) {
        self.velocity = state.velocity;
        self.acceleration = 0.0;
    }

    fn kind(&self) -> MechanismKind {
        MechanismKind::Flywheel
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mech_common::presets;

    const DT: f64 = 0.02;

    #[test]
    fn spins_up_to_free_speed() {
        let file = presets::flywheel();
        let mut p = FlywheelPlant::from_physics(&file.mechanism).unwrap();
        for _ in 0..2000 {
            p.step(12.0, DT);
        }
        // Direct drive at nominal voltage: wheel runs at the motor's free speed
        // less the free-current drop that the linear model ignores.
        let m = file.mechanism.motor;
        let expected = 12.0 * m.kv();
        assert!((p.state().velocity - expected).abs() < 1e-6 * expected);
    }

    #[test]
    fn matches_first_order_response() {
        let file = presets::flywheel();
        let mut p = FlywheelPlant::from_physics(&file.mechanism).unwrap();
        let sys = *p.system();
        let (a, b) = (sys.a[(0, 0)], sys.b[0]);
        for _ in 0..10 {
            p.step(6.0, DT);
        }
        let t = 10.0 * DT;
        let v_ss = -b * 6.0 / a;
        let expected = v_ss * (1.0 - (a * t).exp());
        assert!((p.state().velocity - expected).abs() < 1e-6 * v_ss);
    }

    #[test]
    fn characterized_steady_state() {
        let file = presets::flywheel();
        let ff = FeedforwardGains::new(0.0, 0.0, 0.02, 0.004);
        let mut p = FlywheelPlant::from_characterization(&file.mechanism, &ff).unwrap();
        for _ in 0..500 {
            p.step(6.0, DT);
        }
        // kV·v = u at steady state.
        assert!((p.state().velocity - 300.0).abs() < 1e-6);
    }

    #[test]
    fn unbounded_and_no_events() {
        let file = presets::flywheel();
        let mut p = FlywheelPlant::from_physics(&file.mechanism).unwrap();
        p.set_state(MotionState::spinning(-10_000.0));
        let r = p.step(-12.0, DT);
        assert_eq!(r.boundary, None);
        assert_eq!(r.state.position, 0.0);
    }

    #[test]
    fn coasts_down_without_voltage() {
        let file = presets::flywheel();
        let mut p = FlywheelPlant::from_physics(&file.mechanism).unwrap();
        p.set_state(MotionState::spinning(400.0));
        p.step(0.0, DT);
        assert!(p.state().velocity < 400.0);
        assert!(p.state().acceleration < 0.0);
    }

    #[test]
    fn wrong_kind_rejected() {
        let file = presets::elevator();
        assert!(FlywheelPlant::from_physics(&file.mechanism).is_err());
    }
}

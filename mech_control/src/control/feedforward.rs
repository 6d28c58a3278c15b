//! Feedforward model.
//!
//! Static friction (kS × sign(velocity)), gravity (kG, elevator only),
//! velocity (kV × velocity) and acceleration (kA × acceleration) terms.
//! Zero gains disable each component. Pure: no state, no side effects.

use mech_common::gains::FeedforwardGains;
use mech_common::mechanism::MechanismKind;

/// Sign with `sign(0) = 0` (`f64::signum` returns ±1 for ±0).
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Compute the open-loop voltage for a commanded motion.
///
/// ```text
/// ff = kS × sign(v) + kG + kV × v + kA × a      (elevator)
/// ff = kS × sign(v)      + kV × v + kA × a      (flywheel)
/// ```
///
/// # Arguments
/// - `kind`: Mechanism variant; only the elevator carries the kG term.
/// - `gains`: Feedforward gains.
/// - `velocity`: Commanded velocity [unit/s].
/// - `acceleration`: Commanded acceleration [unit/s²].
#[inline]
pub fn feedforward_compute(
    kind: MechanismKind,
    gains: &FeedforwardGains,
    velocity: f64,
    acceleration: f64,
) -> f64 {
    let mut output = gains.ks * sign(velocity) + gains.kv * velocity + gains.ka * acceleration;

    if kind == MechanismKind::Elevator {
        output += gains.kg;
    }

    output
}

/// Feedforward bound to one mechanism kind.
#[derive(Debug, Clone, Copy)]
pub struct Feedforward {
    kind: MechanismKind,
    gains: FeedforwardGains,
}

impl Feedforward {
    pub fn new(kind: MechanismKind, gains: FeedforwardGains) -> Self {
        Self { kind, gains }
    }

    /// Open-loop voltage for the commanded velocity and acceleration.
    #[inline]
    pub fn calculate(&self, velocity: f64, acceleration: f64) -> f64 {
        feedforward_compute(self.kind, &self.gains, velocity, acceleration)
    }

    /// Constant offset that does not depend on motion (kG or 0).
    #[inline]
    fn gravity(&self) -> f64 {
        match self.kind {
            MechanismKind::Elevator => self.gains.kg,
            MechanismKind::Flywheel => 0.0,
        }
    }

    /// Highest forward velocity reachable at `acceleration` with `max_voltage`.
    ///
    /// Returns `None` when kV is zero (velocity does not cost voltage).
    pub fn max_achievable_velocity(&self, max_voltage: f64, acceleration: f64) -> Option<f64> {
        if self.gains.kv == 0.0 {
            return None;
        }
        Some(
            (max_voltage - self.gains.ks - self.gravity() - self.gains.ka * acceleration)
                / self.gains.kv,
        )
    }

    /// Highest acceleration reachable at `velocity` with `max_voltage`.
    ///
    /// Returns `None` when kA is zero.
    pub fn max_achievable_acceleration(&self, max_voltage: f64, velocity: f64) -> Option<f64> {
        if self.gains.ka == 0.0 {
            return None;
        }
        Some(
            (max_voltage - self.gains.ks * sign(velocity) - self.gravity() - self.gains.kv * velocity)
                / self.gains.ka,
        )
    }

    #[inline]
    pub fn gains(&self) -> &FeedforwardGains {
        &self.gains
    }

    #[inline]
    pub fn kind(&self) -> MechanismKind {
        self.kind
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

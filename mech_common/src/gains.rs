//! Feedback and feedforward gain sets.
//!
//! A negative gain is the "not yet characterized" sentinel. A [`GainSet`]
//! carrying one is *unset* and must never drive an actuator; the motion
//! controller fails closed (zero voltage) until valid gains arrive.
//!
//! `kg` is exempt from the sentinel check: a counterbalanced elevator can
//! legitimately need a negative gravity term.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// PID feedback gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain [V per unit error].
    #[serde(default)]
    pub kp: f64,
    /// Integral gain [V per unit error·s].
    #[serde(default)]
    pub ki: f64,
    /// Derivative gain [V per unit error/s].
    #[serde(default)]
    pub kd: f64,
}

impl PidGains {
    /// All three gains set to the unset sentinel.
    pub const UNSET: Self = Self {
        kp: -1.0,
        ki: -1.0,
        kd: -1.0,
    };

    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// Feedforward gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedforwardGains {
    /// Static friction voltage [V].
    #[serde(default)]
    pub ks: f64,
    /// Gravity compensation voltage [V] (elevator only).
    #[serde(default)]
    pub kg: f64,
    /// Velocity gain [V per unit/s].
    #[serde(default)]
    pub kv: f64,
    /// Acceleration gain [V per unit/s²].
    #[serde(default)]
    pub ka: f64,
}

impl FeedforwardGains {
    /// Sentinel feedforward for an uncharacterized mechanism.
    pub const UNSET: Self = Self {
        ks: -1.0,
        kg: 0.0,
        kv: -1.0,
        ka: -1.0,
    };

    pub const fn new(ks: f64, kg: f64, kv: f64, ka: f64) -> Self {
        Self { ks, kg, kv, ka }
    }
}

/// Which measured quantity the feedback loop closes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Error = commanded position − measured position.
    #[default]
    Position,
    /// Error = commanded velocity − measured velocity.
    Velocity,
}

/// One active loop's complete gain set: feedback plus feedforward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GainSet {
    pub feedback: PidGains,
    pub feedforward: FeedforwardGains,
}

impl GainSet {
    pub const fn new(feedback: PidGains, feedforward: FeedforwardGains) -> Self {
        Self {
            feedback,
            feedforward,
        }
    }

    /// Check every gain for the unset sentinel and for non-finite values.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ValidationError` if any gain is NaN or infinite
    /// - `ConfigError::UnsetGains` naming the first negative gain
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fb = &self.feedback;
        let ff = &self.feedforward;
        let checked = [
            ("kp", fb.kp),
            ("ki", fb.ki),
            ("kd", fb.kd),
            ("ks", ff.ks),
            ("kv", ff.kv),
            ("ka", ff.ka),
        ];

        if !ff.kg.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "kg must be finite (got {})",
                ff.kg
            )));
        }
        for (field, value) in checked {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must be finite (got {value})"
                )));
            }
            if value < 0.0 {
                return Err(ConfigError::UnsetGains { field, value });
            }
        }
        Ok(())
    }

    /// True when the set may not be used to drive an actuator.
    #[inline]
    pub fn is_unset(&self) -> bool {
        self.validate().is_err()
    }
}

/// All gains configured for one mechanism.
///
/// The feedforward model is shared; position and velocity loops each carry
/// their own PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MechanismGains {
    pub feedforward: FeedforwardGains,
    #[serde(default)]
    pub position: PidGains,
    #[serde(default)]
    pub velocity: PidGains,
}

impl MechanismGains {
    /// Gain set used by a loop running in `mode`.
    #[inline]
    pub fn gain_set(&self, mode: ControlMode) -> GainSet {
        let feedback = match mode {
            ControlMode::Position => self.position,
            ControlMode::Velocity => self.velocity,
        };
        GainSet::new(feedback, self.feedforward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elevator_set() -> GainSet {
        GainSet::new(
            PidGains::new(1.0, 0.0, 0.2),
            FeedforwardGains::new(0.01, 1.3, 0.5, 0.1),
        )
    }

    #[test]
    fn valid_set_passes() {
        assert!(elevator_set().validate().is_ok());
        assert!(!elevator_set().is_unset());
    }

    #[test]
    fn negative_kv_is_unset() {
        let mut set = elevator_set();
        set.feedforward.kv = -1.0;
        assert_eq!(
            set.validate(),
            Err(ConfigError::UnsetGains {
                field: "kv",
                value: -1.0
            })
        );
    }

    #[test]
    fn negative_ka_is_unset() {
        let mut set = elevator_set();
        set.feedforward.ka = -1.0;
        assert!(set.is_unset());
    }

    #[test]
    fn unset_feedback_is_unset() {
        let set = GainSet::new(PidGains::UNSET, FeedforwardGains::new(0.0, 0.0, 0.1, 0.01));
        assert_eq!(
            set.validate(),
            Err(ConfigError::UnsetGains {
                field: "kp",
                value: -1.0
            })
        );
    }

    #[test]
    fn negative_kg_is_allowed() {
        let mut set = elevator_set();
        set.feedforward.kg = -0.4;
        assert!(set.validate().is_ok());
    }

    #[test]
    fn nan_gain_is_a_validation_error() {
        let mut set = elevator_set();
        set.feedback.kd = f64::NAN;
        assert!(matches!(
            set.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn gain_set_per_mode() {
        let gains = MechanismGains {
            feedforward: FeedforwardGains::new(0.01, 1.3, 0.5, 0.1),
            position: PidGains::new(1.0, 0.0, 0.2),
            velocity: PidGains::new(2.0, 0.1, 0.0),
        };
        assert_eq!(gains.gain_set(ControlMode::Position).feedback.kp, 1.0);
        assert_eq!(gains.gain_set(ControlMode::Velocity).feedback.kp, 2.0);
        assert_eq!(gains.gain_set(ControlMode::Velocity).feedforward.kg, 1.3);
    }

    #[test]
    fn control_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: ControlMode,
        }
        let w: Wrapper = toml::from_str("mode = \"velocity\"").unwrap();
        assert_eq!(w.mode, ControlMode::Velocity);
    }
}

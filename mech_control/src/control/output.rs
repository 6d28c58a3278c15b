//! Motion controller: feedforward + feedback summed and clamped each tick.
//!
//! Owns the only per-tick mutable controller state (the PID's). Mechanism
//! constants are read at construction; gains can be swapped at any tick
//! boundary. An unset gain set (negative sentinel) makes the controller fail
//! closed: zero volts until valid gains arrive.

use mech_common::config::ConfigError;
use mech_common::gains::{ControlMode, GainSet, MechanismGains};
use mech_common::mechanism::{MechanismConfig, MechanismKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::MotionState;
use super::feedforward::Feedforward;
use super::pid::PidController;

/// Why a tick produced zero output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlFault {
    /// The active gain set carries the "not characterized" sentinel.
    UnsetGains,
    /// Commanded or measured state contained NaN or infinity.
    NonFiniteInput,
}

/// Result of one control tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlOutput {
    /// Voltage to apply, always within ±battery voltage [V].
    pub voltage: f64,
    /// Feedforward contribution before clamping [V].
    pub feedforward: f64,
    /// Feedback contribution before clamping [V].
    pub feedback: f64,
    /// Whether the clamp engaged.
    pub saturated: bool,
    /// Set when the controller refused to actuate.
    pub fault: Option<ControlFault>,
}

impl ControlOutput {
    fn faulted(fault: ControlFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::default()
        }
    }

    /// Returns true if all numeric fields are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.voltage.is_finite() && self.feedforward.is_finite() && self.feedback.is_finite()
    }
}

/// Per-mechanism motion controller.
#[derive(Debug, Clone)]
pub struct MotionController {
    name: String,
    kind: MechanismKind,
    max_voltage: f64,
    gains: MechanismGains,
    mode: ControlMode,
    feedforward: Feedforward,
    feedback: PidController,
    /// Validation result of the active gain set.
    gain_status: Result<(), ConfigError>,
    /// Consecutive faulted ticks (log throttling).
    fault_streak: u64,
}

impl MotionController {
    /// Build a controller for `config` running the `mode` loop.
    ///
    /// Unset gains are accepted and reported (the controller will output
    /// zero volts); an invalid mechanism or a mode it cannot run is an error.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `config` fails validation (e.g. a
    /// non-positive battery voltage) or `config.kind` does not support `mode`.
    pub fn new(
        config: &MechanismConfig,
        gains: MechanismGains,
        mode: ControlMode,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        check_mode(config.kind, mode)?;
        let active = gains.gain_set(mode);
        let gain_status = active.validate();
        if let Err(e) = &gain_status {
            warn!(mechanism = %config.name, "{e}; output held at 0 V");
        }

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            max_voltage: config.battery_voltage,
            gains,
            mode,
            feedforward: Feedforward::new(config.kind, active.feedforward),
            feedback: PidController::new(active.feedback),
            gain_status,
            fault_streak: 0,
        })
    }

    /// Compute the voltage command for one tick.
    ///
    /// ```text
    /// voltage = clamp(ff(commanded.v, commanded.a) + pid(commanded − measured, dt), ±Vbat)
    /// ```
    ///
    /// The error is taken on position or velocity depending on the mode.
    pub fn tick(&mut self, commanded: &MotionState, measured: &MotionState, dt: f64) -> ControlOutput {
        if self.gain_status.is_err() {
            return self.fault(ControlFault::UnsetGains);
        }
        if !commanded.is_finite() || !measured.is_finite() {
            return self.fault(ControlFault::NonFiniteInput);
        }
        if self.fault_streak > 0 {
            debug!(mechanism = %self.name, ticks = self.fault_streak, "fault cleared");
            self.fault_streak = 0;
        }

        let error = match self.mode {
            ControlMode::Position => commanded.position - measured.position,
            ControlMode::Velocity => commanded.velocity - measured.velocity,
        };

        let feedforward = self
            .feedforward
            .calculate(commanded.velocity, commanded.acceleration);
        let feedback = self.feedback.update(error, dt);
        let raw = feedforward + feedback;
        let voltage = raw.clamp(-self.max_voltage, self.max_voltage);

        ControlOutput {
            voltage,
            feedforward,
            feedback,
            saturated: voltage != raw,
            fault: None,
        }
    }

    fn fault(&mut self, fault: ControlFault) -> ControlOutput {
        if self.fault_streak == 0 {
            warn!(mechanism = %self.name, ?fault, "refusing to actuate");
        }
        self.fault_streak += 1;
        ControlOutput::faulted(fault)
    }

    /// Replace the gains at a tick boundary.
    ///
    /// PID state is kept; call [`reset`](Self::reset) as well for a clean
    /// start. Plant state is never touched by the controller.
    pub fn set_gains(&mut self, gains: MechanismGains) {
        self.gains = gains;
        self.apply_active();
    }

    /// Switch between position and velocity loops. Resets the PID.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if the mechanism does not support `mode`;
    /// the controller is left unchanged.
    pub fn set_mode(&mut self, mode: ControlMode) -> Result<(), ConfigError> {
        check_mode(self.kind, mode)?;
        if mode != self.mode {
            info!(mechanism = %self.name, ?mode, "control mode changed");
            self.mode = mode;
            self.feedback.reset();
            self.apply_active();
        }
        Ok(())
    }

    /// Clear controller state (integral, previous error).
    #[inline]
    pub fn reset(&mut self) {
        self.feedback.reset();
    }

    fn apply_active(&mut self) {
        let active = self.active_gains();
        let status = active.validate();
        match (&self.gain_status, &status) {
            (Err(_), Ok(())) => info!(mechanism = %self.name, "gains valid, actuation enabled"),
            (Ok(()), Err(e)) => warn!(mechanism = %self.name, "{e}; output held at 0 V"),
            _ => debug!(mechanism = %self.name, "gains updated"),
        }
        self.gain_status = status;
        self.feedforward = Feedforward::new(self.kind, active.feedforward);
        self.feedback.set_gains(active.feedback);
    }

    /// Gain set of the running loop.
    #[inline]
    pub fn active_gains(&self) -> GainSet {
        self.gains.gain_set(self.mode)
    }

    /// `Ok` when the controller will actuate.
    #[inline]
    pub fn gain_status(&self) -> Result<(), ConfigError> {
        self.gain_status.clone()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.gain_status.is_ok()
    }

    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    #[inline]
    pub fn kind(&self) -> MechanismKind {
        self.kind
    }

    #[inline]
    pub fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    #[inline]
    pub fn feedback(&self) -> &PidController {
        &self.feedback
    }
}

fn check_mode(kind: MechanismKind, mode: ControlMode) -> Result<(), ConfigError> {
    if kind.supports(mode) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{kind} does not support {mode:?} control"
        )))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! PID feedback controller with forward-Euler integration and a raw
//! backward-difference derivative.
//!
//! Zero Ki disables (and clears) the integral; zero Kd disables the derivative.
//! A non-positive or non-finite `dt` never divides: the derivative is taken as
//! zero and neither the integral nor the previous error advances.

use mech_common::gains::PidGains;

/// Internal state of the PID controller (the per-loop `ControllerState`).
///
/// Owned by exactly one [`PidController`]. Reset on construction, on
/// [`PidController::reset`], and whenever the owning motion controller
/// switches mode.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Integral accumulator [error·s].
    integral: f64,
    /// Previous error (for derivative).
    prev_error: f64,
    /// Time covered by accepted samples [s].
    elapsed: f64,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    #[inline]
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Compute one PID cycle.
///
/// # Arguments
/// - `state`: Mutable PID internal state.
/// - `gains`: PID gains for this loop.
/// - `error`: Current error (commanded − measured).
/// - `dt`: Time since the previous sample [s].
///
/// # Returns
/// Correction voltage [V] (unsaturated; the output stage clamps).
#[inline]
pub fn pid_compute(state: &mut PidState, gains: &PidGains, error: f64, dt: f64) -> f64 {
    let p_term = gains.kp * error;

    if !(dt > 0.0 && dt.is_finite()) {
        // No time has passed: hold integral, no derivative, keep prev_error.
        return p_term + gains.ki * state.integral;
    }

    // ── I term (forward Euler) ──────────────────────────────
    let i_term = if gains.ki != 0.0 {
        state.integral += error * dt;
        gains.ki * state.integral
    } else {
        state.integral = 0.0;
        0.0
    };

    // ── D term ──────────────────────────────────────────────
    let d_term = if gains.kd != 0.0 {
        gains.kd * (error - state.prev_error) / dt
    } else {
        0.0
    };

    state.prev_error = error;
    state.elapsed += dt;

    p_term + i_term + d_term
}

/// Feedback controller: a [`PidGains`] set plus the state it integrates.
///
/// The same type serves the position loop and the velocity loop; only the
/// gains differ.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    state: PidState,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            state: PidState::default(),
        }
    }

    /// Advance one sample and return the correction voltage.
    #[inline]
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        pid_compute(&mut self.state, &self.gains, error, dt)
    }

    /// Clear integral, previous error and elapsed time.
    #[inline]
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Swap gains at a tick boundary. State is kept.
    #[inline]
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    #[inline]
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    #[inline]
    pub fn state(&self) -> &PidState {
        &self.state
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! Closed-loop simulation harness.
//!
//! Alternates [`MotionController::tick`] and [`Plant::step`] at a fixed
//! period. The harness is an infinite [`Iterator`] of [`Sample`]s: bound it
//! with `take`, or use [`SimulationHarness::run_for`]. [`restart`] rewinds to
//! the initial plant state so the same run can be replayed.
//!
//! [`restart`]: SimulationHarness::restart

use mech_common::config::ConfigError;
use mech_common::gains::ControlMode;
use mech_common::mechanism::MechanismConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::control::MotionState;
use crate::control::output::{ControlFault, MotionController};
use crate::control::profile::TrapezoidProfile;
use crate::plant::{BoundaryEvent, Plant};

/// What the mechanism is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    /// Command a fixed state every tick (a step set-point).
    Hold(MotionState),
    /// Follow a trapezoidal profile from the current state to `goal`.
    Profiled { goal: MotionState },
}

/// One simulated tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub tick: u64,
    /// Start of the tick [s].
    pub time: f64,
    pub commanded: MotionState,
    /// State the controller saw (after the encoder model).
    pub measured: MotionState,
    /// Voltage held over the tick [V].
    pub voltage: f64,
    /// Motor current during the tick [A].
    pub current: f64,
    /// Hard stop hit during the tick.
    pub boundary: Option<BoundaryEvent>,
    /// Why the controller refused to actuate, if it did.
    pub fault: Option<ControlFault>,
}

/// Controller + plant pair driven at a fixed period.
pub struct SimulationHarness {
    config: MechanismConfig,
    controller: MotionController,
    plant: Box<dyn Plant>,
    command: CommandSource,
    /// Command given at construction; what [`restart`](Self::restart) replays.
    initial_command: CommandSource,
    profile: Option<TrapezoidProfile>,
    /// Tick at which the current profile started.
    profile_start: u64,
    initial: MotionState,
    dt: f64,
    tick: u64,
}

impl SimulationHarness {
    /// Pair `controller` with `plant`, starting from the plant's current state.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `dt` is not a positive finite period,
    /// the plant and config disagree on the mechanism kind, or a profiled
    /// command is requested without profile constraints or outside position
    /// mode.
    pub fn new(
        config: &MechanismConfig,
        controller: MotionController,
        plant: Box<dyn Plant>,
        command: CommandSource,
        dt: f64,
    ) -> Result<Self, ConfigError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "simulation period must be > 0 (got {dt})"
            )));
        }
        if plant.kind() != config.kind || controller.kind() != config.kind {
            return Err(ConfigError::ValidationError(format!(
                "plant ({}) / controller ({}) do not match a {} config",
                plant.kind(),
                controller.kind(),
                config.kind
            )));
        }

        let initial = plant.state();
        let mut harness = Self {
            config: config.clone(),
            controller,
            plant,
            command,
            initial_command: command,
            profile: None,
            profile_start: 0,
            initial,
            dt,
            tick: 0,
        };
        harness.plan(command)?;

        info!(
            mechanism = %harness.config.name,
            dt,
            mode = ?harness.controller.mode(),
            armed = harness.controller.is_armed(),
            "simulation ready"
        );
        Ok(harness)
    }

    fn plan(&mut self, command: CommandSource) -> Result<(), ConfigError> {
        self.profile = match command {
            CommandSource::Hold(_) => None,
            CommandSource::Profiled { goal } => {
                let constraints = self.config.constraints.ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "{} has no motion constraints for a profiled command",
                        self.config.name
                    ))
                })?;
                if self.controller.mode() != ControlMode::Position {
                    return Err(ConfigError::ValidationError(
                        "profiled commands need position mode".to_string(),
                    ));
                }
                Some(TrapezoidProfile::plan(constraints, self.plant.state(), goal))
            }
        };
        self.command = command;
        self.profile_start = self.tick;
        Ok(())
    }

    /// Replace the command at the next tick boundary.
    ///
    /// A profiled command is planned from the plant's current state.
    pub fn retarget(&mut self, command: CommandSource) -> Result<(), ConfigError> {
        self.plan(command)?;
        debug!(mechanism = %self.config.name, ?command, tick = self.tick, "retargeted");
        Ok(())
    }

    /// Rewind to the initial plant state and command, and clear controller
    /// state.
    ///
    /// Replaying after a restart yields the same samples as the first run,
    /// even if the run was retargeted in between.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.plant.set_state(self.initial);
        self.controller.reset();
        self.tick = 0;
        self.plan(self.initial_command)?;
        debug!(mechanism = %self.config.name, "simulation restarted");
        Ok(())
    }

    /// Simulate `duration` seconds (rounded to whole ticks).
    pub fn run_for(&mut self, duration: f64) -> Vec<Sample> {
        let ticks = (duration / self.dt).round().max(0.0) as usize;
        self.by_ref().take(ticks).collect()
    }

    fn commanded_at(&self, tick: u64) -> MotionState {
        match (&self.command, &self.profile) {
            (_, Some(profile)) => {
                let t = (tick - self.profile_start) as f64 * self.dt;
                profile.sample(t)
            }
            (CommandSource::Hold(state), None) => *state,
            (CommandSource::Profiled { goal }, None) => *goal,
        }
    }

    /// Plant state as the encoder reports it.
    fn measure(&self) -> MotionState {
        let mut state = self.plant.state();
        state.position = self.config.quantize_position(state.position);
        state
    }

    /// Controller, e.g. for live gain edits between ticks.
    #[inline]
    pub fn controller_mut(&mut self) -> &mut MotionController {
        &mut self.controller
    }

    #[inline]
    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    #[inline]
    pub fn plant(&self) -> &dyn Plant {
        self.plant.as_ref()
    }

    /// Simulated time at the start of the next tick [s].
    #[inline]
    pub fn time(&self) -> f64 {
        self.tick as f64 * self.dt
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl Iterator for SimulationHarness {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let tick = self.tick;
        let commanded = self.commanded_at(tick);
        let measured = self.measure();

        let output = self.controller.tick(&commanded, &measured, self.dt);
        let report = self.plant.step(output.voltage, self.dt);

        self.tick += 1;
        Some(Sample {
            tick,
            time: tick as f64 * self.dt,
            commanded,
            measured,
            voltage: output.voltage,
            current: report.current,
            boundary: report.boundary,
            fault: output.fault,
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! Mechanism bundle loader.
//!
//! Reads a [`MechanismFile`], validates the physical description and startup
//! mode, and records whether the gains are characterized. Unset gains are not
//! a load error: the bundle still loads, a warning is logged, and the
//! controller built from it fails closed.

use std::path::Path;

use mech_common::config::{ConfigError, ConfigLoader};
use mech_common::mechanism::MechanismFile;
use tracing::{info, warn};

use crate::control::output::MotionController;
use crate::plant::{self, ModelSource, Plant};
use crate::sim::{CommandSource, SimulationHarness};

// ─── Loaded Bundle ──────────────────────────────────────────────────

/// Validated mechanism description, ready to build runtime components.
#[derive(Debug, Clone)]
pub struct LoadedMechanism {
    pub file: MechanismFile,
    /// Validation result of the startup gain set.
    pub gain_status: Result<(), ConfigError>,
}

impl LoadedMechanism {
    /// Wrap an already-parsed file (e.g. a preset).
    pub fn from_file(file: MechanismFile) -> Result<Self, ConfigError> {
        file.validate()?;

        let gain_status = file.gains.gain_set(file.mode).validate();
        match &gain_status {
            Ok(()) => info!(
                mechanism = %file.mechanism.name,
                kind = %file.mechanism.kind,
                mode = ?file.mode,
                "mechanism loaded"
            ),
            Err(e) => warn!(
                mechanism = %file.mechanism.name,
                "mechanism loaded with {e}"
            ),
        }

        Ok(Self { file, gain_status })
    }

    /// Controller for the startup mode.
    pub fn controller(&self) -> Result<MotionController, ConfigError> {
        MotionController::new(&self.file.mechanism, self.file.gains, self.file.mode)
    }

    /// Plant model for this mechanism.
    pub fn plant(&self, source: ModelSource) -> Result<Box<dyn Plant>, ConfigError> {
        plant::build(&self.file.mechanism, source, &self.file.gains.feedforward)
    }

    /// Controller + plant wired into a harness running `command` every `dt`.
    pub fn harness(
        &self,
        source: ModelSource,
        command: CommandSource,
        dt: f64,
    ) -> Result<SimulationHarness, ConfigError> {
        SimulationHarness::new(
            &self.file.mechanism,
            self.controller()?,
            self.plant(source)?,
            command,
            dt,
        )
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate a mechanism TOML file.
pub fn load_mechanism(path: &Path) -> Result<LoadedMechanism, ConfigError> {
    let file = MechanismFile::load(path)?;
    LoadedMechanism::from_file(file)
}

/// Load from a TOML string (for testing).
pub fn load_mechanism_from_str(content: &str) -> Result<LoadedMechanism, ConfigError> {
    let file = MechanismFile::from_toml_str(content)?;
    LoadedMechanism::from_file(file)
}

// ─── Tests ──────────────────────────────────────────────────────────

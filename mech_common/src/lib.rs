//! Mechanism Common Library
//!
//! Shared constants, configuration types and loading utilities for the
//! mechanism control workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Loop period, battery voltage and physical constants
//! - [`config`] - Configuration loading trait and error type
//! - [`motor`] - DC motor characteristics
//! - [`mechanism`] - `MechanismKind` and the immutable `MechanismConfig`
//! - [`gains`] - Feedback / feedforward gain sets and the unset sentinel
//! - [`presets`] - Built-in elevator and flywheel tunings
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use mech_common::prelude::*;
//!
//! let elevator = presets::elevator();
//! assert_eq!(elevator.mechanism.kind, MechanismKind::Elevator);
//! assert!(elevator.gains.gain_set(ControlMode::Position).validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod gains;
pub mod mechanism;
pub mod motor;
pub mod prelude;
pub mod presets;

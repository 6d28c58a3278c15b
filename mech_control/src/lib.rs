//! # Mechanism Control Library
//!
//! Control engine for single-degree-of-freedom mechanisms driven by DC
//! motors. Each tick the [`control::output::MotionController`] sums a
//! feedforward term and PID feedback into a voltage command, clamped to the
//! battery voltage.
//!
//! ## Variants
//!
//! - **Elevator**: position or velocity control, gravity feedforward,
//!   hard stops at the travel bounds.
//! - **Flywheel**: velocity control only, no gravity, unbounded.
//!
//! ## Simulation
//!
//! [`plant`] provides state-space plant models (from motor physics or from
//! the feedforward characterization) and [`sim::SimulationHarness`] closes
//! the loop at a fixed period, yielding one [`sim::Sample`] per tick.
//!
//! ## Failing Closed
//!
//! A gain set carrying the negative "not characterized" sentinel never
//! drives the actuator: the controller outputs 0 V and reports
//! [`control::output::ControlFault::UnsetGains`].

pub mod config;
pub mod control;
pub mod plant;
pub mod sim;

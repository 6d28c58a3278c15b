//! Closed-loop convergence of the reference elevator.
//!
//! Carriage 22.68 kg on a 0.0254 m drum, gearing 0.01, position loop
//! kP 1 / kI 0 / kD 0.2 with kS 0.01, kG 1.3, kV 0.5, kA 0.1. The plant is the
//! characterized model, so the feedforward matches it exactly and the closed
//! loop has poles at −2 and −5.

use mech_common::consts::DT;
use mech_common::gains::ControlMode;
use mech_common::presets;
use mech_control::control::MotionState;
use mech_control::control::output::MotionController;
use mech_control::plant::ElevatorPlant;
use mech_control::sim::{CommandSource, Sample, SimulationHarness};

fn reference_harness(command: CommandSource) -> SimulationHarness {
    let file = presets::elevator();
    let controller =
        MotionController::new(&file.mechanism, file.gains, ControlMode::Position).unwrap();
    let plant =
        ElevatorPlant::from_characterization(&file.mechanism, &file.gains.feedforward).unwrap();
    SimulationHarness::new(&file.mechanism, controller, Box::new(plant), command, DT).unwrap()
}

#[test]
fn hold_half_meter_converges() {
    let mut harness = reference_harness(CommandSource::Hold(MotionState::at(0.5)));
    let samples: Vec<Sample> = harness.by_ref().take(250).collect();

    assert_eq!(samples.len(), 250);
    for s in &samples {
        assert!(s.voltage.abs() <= 12.0, "tick {}: {} V", s.tick, s.voltage);
        assert_eq!(s.fault, None);
    }

    let final_position = harness.plant().state().position;
    assert!(
        (final_position - 0.5).abs() < 0.01,
        "final position {final_position}"
    );
}

#[test]
fn settles_to_gravity_voltage() {
    let mut harness = reference_harness(CommandSource::Hold(MotionState::at(0.5)));
    let samples = harness.run_for(10.0);
    let last = samples.last().unwrap();
    assert!((last.voltage - 1.3).abs() < 0.01, "{} V", last.voltage);
    assert!(harness.plant().state().velocity.abs() < 1e-3);
}

#[test]
fn step_response_has_no_large_overshoot() {
    let mut harness = reference_harness(CommandSource::Hold(MotionState::at(0.5)));
    let peak = harness
        .run_for(5.0)
        .iter()
        .map(|s| s.measured.position)
        .fold(f64::MIN, f64::max);
    // Overdamped closed loop.
    assert!(peak < 0.5 + 0.01, "peak {peak}");
}

#[test]
fn profiled_move_tracks_and_arrives() {
    let mut harness = reference_harness(CommandSource::Profiled {
        goal: MotionState::at(1.5),
    });
    let samples = harness.run_for(6.0);

    let max_lag = samples
        .iter()
        .map(|s| (s.commanded.position - s.measured.position).abs())
        .fold(0.0, f64::max);
    assert!(max_lag < 0.1, "max lag {max_lag}");

    let arrived = harness.plant().state().position;
    assert!((arrived - 1.5).abs() < 0.01, "arrived at {arrived}");
}

#[test]
fn velocity_loop_tracks_constant_speed() {
    let file = presets::elevator();
    let controller =
        MotionController::new(&file.mechanism, file.gains, ControlMode::Velocity).unwrap();
    let plant =
        ElevatorPlant::from_characterization(&file.mechanism, &file.gains.feedforward).unwrap();
    let mut harness = SimulationHarness::new(
        &file.mechanism,
        controller,
        Box::new(plant),
        CommandSource::Hold(MotionState::new(0.0, 0.3, 0.0)),
        DT,
    )
    .unwrap();

    harness.run_for(2.0);
    let v = harness.plant().state().velocity;
    assert!((v - 0.3).abs() < 0.01, "velocity {v}");
}

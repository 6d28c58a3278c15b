//! Uncharacterized mechanisms never drive the actuator.

use mech_common::consts::DT;
use mech_common::gains::{ControlMode, FeedforwardGains, MechanismGains, PidGains};
use mech_common::presets;
use mech_control::control::MotionState;
use mech_control::control::output::{ControlFault, MotionController};
use mech_control::plant::FlywheelPlant;
use mech_control::sim::{CommandSource, SimulationHarness};

fn sentinel_flywheel() -> MotionController {
    let file = presets::flywheel();
    MotionController::new(&file.mechanism, file.gains, ControlMode::Velocity).unwrap()
}

#[test]
fn sentinel_pid_outputs_zero_for_any_error() {
    let mut controller = sentinel_flywheel();
    let measured = MotionState::spinning(0.0);
    for commanded in [-1.0e6, -600.0, -1.0, 0.0, 1.0e-9, 42.0, 600.0, 1.0e6] {
        let out = controller.tick(&MotionState::spinning(commanded), &measured, DT);
        assert_eq!(out.voltage, 0.0, "commanded {commanded}");
        assert_eq!(out.fault, Some(ControlFault::UnsetGains));
    }
}

#[test]
fn sentinel_pid_with_valid_feedforward_still_zero() {
    let file = presets::flywheel();
    let gains = MechanismGains {
        feedforward: FeedforwardGains::new(0.1, 0.0, 0.02, 0.001),
        position: PidGains::UNSET,
        velocity: PidGains::UNSET,
    };
    let mut controller =
        MotionController::new(&file.mechanism, gains, ControlMode::Velocity).unwrap();
    let out = controller.tick(&MotionState::spinning(300.0), &MotionState::spinning(0.0), DT);
    assert_eq!(out.voltage, 0.0);
    assert_eq!(out.feedforward, 0.0);
}

#[test]
fn unarmed_flywheel_stays_still_in_simulation() {
    let file = presets::flywheel();
    let plant = FlywheelPlant::from_physics(&file.mechanism).unwrap();
    let mut harness = SimulationHarness::new(
        &file.mechanism,
        sentinel_flywheel(),
        Box::new(plant),
        CommandSource::Hold(MotionState::spinning(400.0)),
        DT,
    )
    .unwrap();

    for sample in harness.by_ref().take(100) {
        assert_eq!(sample.voltage, 0.0);
        assert_eq!(sample.fault, Some(ControlFault::UnsetGains));
    }
    assert_eq!(harness.plant().state().velocity, 0.0);
}

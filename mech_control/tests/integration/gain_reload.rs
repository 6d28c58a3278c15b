//! Gains swapped at a tick boundary take effect without touching the plant.

use mech_common::consts::DT;
use mech_common::gains::{ControlMode, FeedforwardGains, MechanismGains, PidGains};
use mech_common::presets;
use mech_control::config::LoadedMechanism;
use mech_control::control::MotionState;
use mech_control::control::output::MotionController;
use mech_control::plant::{FlywheelPlant, ModelSource};
use mech_control::sim::{CommandSource, SimulationHarness};

#[test]
fn live_update_keeps_plant_state() {
    let loaded = LoadedMechanism::from_file(presets::elevator()).unwrap();
    let mut harness = loaded
        .harness(
            ModelSource::Characterized,
            CommandSource::Hold(MotionState::at(1.0)),
            DT,
        )
        .unwrap();

    harness.run_for(1.0);
    let before = harness.plant().state();

    let mut gains = loaded.file.gains;
    gains.position = PidGains::new(2.0, 0.0, 0.3);
    harness.controller_mut().set_gains(gains);

    assert_eq!(harness.plant().state(), before);
    assert_eq!(harness.controller().active_gains().feedback, gains.position);

    // The loop keeps converging from where it was.
    harness.run_for(4.0);
    assert!((harness.plant().state().position - 1.0).abs() < 0.01);
}

#[test]
fn arming_an_uncharacterized_flywheel_mid_run() {
    let file = presets::flywheel();
    let characterized = FeedforwardGains::new(0.0, 0.0, 0.02, 0.004);
    let plant = FlywheelPlant::from_characterization(&file.mechanism, &characterized).unwrap();
    let controller =
        MotionController::new(&file.mechanism, file.gains, ControlMode::Velocity).unwrap();
    let mut harness = SimulationHarness::new(
        &file.mechanism,
        controller,
        Box::new(plant),
        CommandSource::Hold(MotionState::spinning(300.0)),
        DT,
    )
    .unwrap();

    let idle = harness.run_for(0.5);
    assert!(idle.iter().all(|s| s.voltage == 0.0));

    harness.controller_mut().set_gains(MechanismGains {
        feedforward: characterized,
        position: PidGains::UNSET,
        velocity: PidGains::new(0.01, 0.0, 0.0),
    });
    assert!(harness.controller().is_armed());

    harness.run_for(5.0);
    let v = harness.plant().state().velocity;
    assert!((v - 300.0).abs() < 1.0, "velocity {v}");
}

#[test]
fn sentinel_update_disarms() {
    let loaded = LoadedMechanism::from_file(presets::elevator()).unwrap();
    let mut harness = loaded
        .harness(
            ModelSource::Characterized,
            CommandSource::Hold(MotionState::at(1.0)),
            DT,
        )
        .unwrap();
    harness.run_for(0.5);

    let mut gains = loaded.file.gains;
    gains.position = PidGains::UNSET;
    harness.controller_mut().set_gains(gains);

    let sample = harness.next().unwrap();
    assert_eq!(sample.voltage, 0.0);
}

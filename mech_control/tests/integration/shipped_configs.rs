//! The mechanism files under `config/` load and run.

use std::path::PathBuf;

use mech_common::consts::DT;
use mech_control::config::load_mechanism;
use mech_control::control::MotionState;
use mech_control::plant::ModelSource;
use mech_control::sim::CommandSource;

fn config_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("config")
        .join(name)
}

#[test]
fn elevator_file_holds_position() {
    let loaded = load_mechanism(&config_path("elevator.toml")).unwrap();
    assert!(loaded.gain_status.is_ok());
    let mut harness = loaded
        .harness(
            ModelSource::Characterized,
            CommandSource::Hold(MotionState::at(0.5)),
            DT,
        )
        .unwrap();
    harness.run_for(5.0);
    assert!((harness.plant().state().position - 0.5).abs() < 0.01);
}

#[test]
fn flywheel_file_loads_unarmed() {
    let loaded = load_mechanism(&config_path("flywheel.toml")).unwrap();
    assert!(loaded.gain_status.is_err());
    let controller = loaded.controller().unwrap();
    assert!(!controller.is_armed());
    // No characterization, so only the physics plant exists.
    assert!(loaded.plant(ModelSource::Characterized).is_err());
    assert!(loaded.plant(ModelSource::Physics).is_ok());
}

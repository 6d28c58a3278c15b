//! Hard stops and deterministic replay through the harness.

use mech_common::consts::DT;
use mech_common::presets;
use mech_control::config::LoadedMechanism;
use mech_control::control::MotionState;
use mech_control::plant::{BoundaryEvent, ModelSource};
use mech_control::sim::{CommandSource, Sample};

#[test]
fn goal_above_travel_clamps_at_upper_stop() {
    let loaded = LoadedMechanism::from_file(presets::elevator()).unwrap();
    let (lo, hi) = loaded.file.mechanism.height_bounds().unwrap();
    let mut harness = loaded
        .harness(
            ModelSource::Characterized,
            CommandSource::Hold(MotionState::at(hi + 1.0)),
            DT,
        )
        .unwrap();

    let samples = harness.run_for(5.0);
    let hit = samples
        .iter()
        .find(|s| s.boundary == Some(BoundaryEvent::Upper))
        .expect("upper stop reached");
    assert!(hit.voltage > 0.0);

    // Measured positions are encoder-quantized: allow one count.
    let count = loaded.file.mechanism.encoder_multiplier.unwrap_or(0.0);
    for s in &samples {
        assert!(s.measured.position >= lo - count && s.measured.position <= hi + count);
    }
    let state = harness.plant().state();
    assert_eq!(state.position, hi);
    assert_eq!(state.velocity, 0.0);
}

#[test]
fn physics_plant_sags_to_lower_stop() {
    // The reference gearing cannot lift the carriage: it sits on the stop.
    let loaded = LoadedMechanism::from_file(presets::elevator()).unwrap();
    let mut harness = loaded
        .harness(
            ModelSource::Physics,
            CommandSource::Hold(MotionState::at(0.5)),
            DT,
        )
        .unwrap();

    let samples = harness.run_for(2.0);
    assert!(samples.iter().any(|s| s.boundary == Some(BoundaryEvent::Lower)));
    for s in &samples {
        assert!(s.voltage.abs() <= 12.0);
    }
    let state = harness.plant().state();
    assert_eq!(state.position, loaded.file.mechanism.min_height);
    assert_eq!(state.velocity, 0.0);
}

#[test]
fn restart_replays_profiled_run() {
    let loaded = LoadedMechanism::from_file(presets::elevator()).unwrap();
    let mut harness = loaded
        .harness(
            ModelSource::Characterized,
            CommandSource::Profiled {
                goal: MotionState::at(1.2),
            },
            DT,
        )
        .unwrap();

    let first: Vec<Sample> = harness.run_for(3.0);
    harness.restart().unwrap();
    let second: Vec<Sample> = harness.run_for(3.0);
    assert_eq!(first, second);
    assert_eq!(second[0].tick, 0);
}

#[test]
fn samples_serialize_as_json_lines() {
    let loaded = LoadedMechanism::from_file(presets::elevator()).unwrap();
    let mut harness = loaded
        .harness(
            ModelSource::Characterized,
            CommandSource::Hold(MotionState::at(0.5)),
            DT,
        )
        .unwrap();
    let sample = harness.next().unwrap();
    let line = serde_json::to_string(&sample).unwrap();
    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["tick"], 0);
    assert!(value["boundary"].is_null());
    let back: Sample = serde_json::from_str(&line).unwrap();
    assert_eq!(back.tick, sample.tick);
    assert_eq!(back.fault, sample.fault);
}

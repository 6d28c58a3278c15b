//! Built-in mechanism tunings.
//!
//! [`elevator`] is the characterized lift. [`flywheel`] has not been
//! characterized yet: every gain carries the `-1` sentinel, so a controller
//! built from it fails closed until real gains are loaded.

use crate::consts::{inches_to_meters, lbs_to_kilograms};
use crate::gains::{ControlMode, FeedforwardGains, MechanismGains, PidGains};
use crate::mechanism::{MechanismConfig, MechanismFile, MechanismKind, MotionConstraints};
use crate::motor::DcMotor;

/// Elevator encoder distance per count [m].
pub const ELEVATOR_ENCODER_MULTIPLIER: f64 = 6.175_038_019_510e-5 * 0.0254;

/// Characterized elevator: 50 lb carriage on a 1 in drum, one NEO 550.
pub fn elevator() -> MechanismFile {
    MechanismFile {
        mechanism: MechanismConfig {
            name: "elevator".to_string(),
            kind: MechanismKind::Elevator,
            motor: DcMotor::neo550(1),
            gearing: 0.01,
            mass: lbs_to_kilograms(50.0),
            drum_radius: inches_to_meters(1.0),
            moment_of_inertia: 0.0,
            min_height: inches_to_meters(5.0),
            max_height: inches_to_meters(90.0),
            encoder_multiplier: Some(ELEVATOR_ENCODER_MULTIPLIER),
            constraints: Some(MotionConstraints {
                max_velocity: 1.5,
                max_acceleration: 1.0,
            }),
            battery_voltage: 12.0,
        },
        gains: MechanismGains {
            feedforward: FeedforwardGains::new(0.01, 1.3, 0.5, 0.1),
            position: PidGains::new(1.0, 0.0, 0.2),
            velocity: PidGains::new(1.0, 0.0, 0.2),
        },
        mode: ControlMode::Position,
    }
}

/// Uncharacterized flywheel on one NEO, direct drive.
pub fn flywheel() -> MechanismFile {
    MechanismFile {
        mechanism: MechanismConfig {
            name: "flywheel".to_string(),
            kind: MechanismKind::Flywheel,
            motor: DcMotor::neo(1),
            gearing: 1.0,
            mass: 0.0,
            drum_radius: 0.0,
            moment_of_inertia: 0.002,
            min_height: 0.0,
            max_height: 0.0,
            encoder_multiplier: None,
            constraints: None,
            battery_voltage: 12.0,
        },
        gains: MechanismGains {
            feedforward: FeedforwardGains::UNSET,
            position: PidGains::UNSET,
            velocity: PidGains::UNSET,
        },
        mode: ControlMode::Velocity,
    }
}

/// Look a preset up by its mechanism name.
pub fn by_name(name: &str) -> Option<MechanismFile> {
    match name {
        "elevator" => Some(elevator()),
        "flywheel" => Some(flywheel()),
        _ => None,
    }
}

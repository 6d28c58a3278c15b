//! Workspace-wide constants.
//!
//! Single source of truth for the loop period, actuator limits and the unit
//! conversions used by the built-in presets.

/// Control loop period [s] (50 Hz).
pub const DT: f64 = 0.02;

/// Nominal battery voltage [V]. Output voltage is clamped to ±this value.
pub const NOMINAL_BATTERY_VOLTAGE: f64 = 12.0;

/// Standard gravity [m/s²].
pub const GRAVITY: f64 = 9.81;

/// Meters per inch.
pub const METERS_PER_INCH: f64 = 0.0254;

/// Kilograms per pound.
pub const KILOGRAMS_PER_POUND: f64 = 0.453_592_37;

/// Radians per second per RPM.
pub const RAD_PER_SEC_PER_RPM: f64 = core::f64::consts::PI / 30.0;

/// Convert inches to meters.
#[inline]
pub const fn inches_to_meters(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}

/// Convert pounds to kilograms.
#[inline]
pub const fn lbs_to_kilograms(lbs: f64) -> f64 {
    lbs * KILOGRAMS_PER_POUND
}

/// Convert RPM to rad/s.
#[inline]
pub const fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * RAD_PER_SEC_PER_RPM
}

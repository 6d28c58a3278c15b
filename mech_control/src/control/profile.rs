//! Trapezoidal motion profile.
//!
//! Plans a minimum-time move between two motion states under the mechanism's
//! velocity and acceleration limits, then samples commanded position,
//! velocity and acceleration at any time since the start of the move.
//! Moves too short to reach cruise velocity degrade to a triangle.

use mech_common::mechanism::MotionConstraints;

use super::MotionState;

/// A planned move. Timing is computed once in [`TrapezoidProfile::plan`].
#[derive(Debug, Clone, Copy)]
pub struct TrapezoidProfile {
    constraints: MotionConstraints,
    /// +1 for upward moves, −1 for downward.
    direction: f64,
    /// Start state, mirrored into the positive direction.
    initial: MotionState,
    /// Goal state, mirrored into the positive direction.
    goal: MotionState,
    end_accel: f64,
    end_full_speed: f64,
    end_decel: f64,
}

impl TrapezoidProfile {
    /// Plan a move from `initial` to `goal`.
    ///
    /// Only position and velocity of the endpoints are used. An initial
    /// velocity above the cruise limit is clipped.
    pub fn plan(constraints: MotionConstraints, initial: MotionState, goal: MotionState) -> Self {
        let direction = if initial.position > goal.position {
            -1.0
        } else {
            1.0
        };
        let mut current = mirror(initial, direction);
        let goal = mirror(goal, direction);

        let max_v = constraints.max_velocity;
        let max_a = constraints.max_acceleration;
        current.velocity = current.velocity.min(max_v);

        // Portions of the ramp already covered by non-zero endpoint velocities.
        let cutoff_begin = current.velocity / max_a;
        let cutoff_dist_begin = cutoff_begin * cutoff_begin * max_a / 2.0;
        let cutoff_end = goal.velocity / max_a;
        let cutoff_dist_end = cutoff_end * cutoff_end * max_a / 2.0;

        let full_trap_dist = cutoff_dist_begin + (goal.position - current.position) + cutoff_dist_end;
        let mut accel_time = max_v / max_a;
        let mut full_speed_dist = full_trap_dist - accel_time * accel_time * max_a;

        if full_speed_dist < 0.0 {
            accel_time = (full_trap_dist / max_a).max(0.0).sqrt();
            full_speed_dist = 0.0;
        }

        let end_accel = accel_time - cutoff_begin;
        let end_full_speed = end_accel + full_speed_dist / max_v;
        let end_decel = end_full_speed + accel_time - cutoff_end;

        Self {
            constraints,
            direction,
            initial: current,
            goal,
            end_accel,
            end_full_speed,
            end_decel,
        }
    }

    /// Commanded state `t` seconds after the start of the move.
    pub fn sample(&self, t: f64) -> MotionState {
        let a = self.constraints.max_acceleration;
        let v0 = self.initial.velocity;
        let mut result = self.initial;

        if t < self.end_accel {
            result.velocity = v0 + t * a;
            result.position += (v0 + t * a / 2.0) * t;
            result.acceleration = a;
        } else if t < self.end_full_speed {
            result.velocity = self.constraints.max_velocity;
            result.position += (v0 + self.end_accel * a / 2.0) * self.end_accel
                + self.constraints.max_velocity * (t - self.end_accel);
            result.acceleration = 0.0;
        } else if t <= self.end_decel {
            let time_left = self.end_decel - t;
            result.velocity = self.goal.velocity + time_left * a;
            result.position = self.goal.position - (self.goal.velocity + time_left * a / 2.0) * time_left;
            result.acceleration = -a;
        } else {
            result = self.goal;
            result.acceleration = 0.0;
        }

        mirror(result, self.direction)
    }

    /// Duration of the whole move [s].
    #[inline]
    pub fn total_time(&self) -> f64 {
        self.end_decel
    }

    /// True once `t` is past the end of the move.
    #[inline]
    pub fn is_finished(&self, t: f64) -> bool {
        t >= self.total_time()
    }
}

#[inline]
fn mirror(state: MotionState, direction: f64) -> MotionState {
    MotionState {
        position: state.position * direction,
        velocity: state.velocity * direction,
        acceleration: state.acceleration * direction,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! Open-loop continuous servo model
//!
//! A continuous-rotation servo has no position feedback: the pulse width
//! only selects spin direction and speed. Position is estimated from how
//! long the servo has been driven, using the calibrated time it takes to
//! sweep 180 degrees.

use crate::calibration::{MAX_ROTATION_MS, MIN_ROTATION_MS};

/// Angle range covered by one calibrated sweep
pub const SWEEP_DEG: f32 = 180.0;

/// Servo PWM frame period (50 Hz)
pub const FRAME_US: u32 = 20_000;

/// Spin command for a continuous servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Spin {
    Stop,
    /// Toward 0 degrees
    Clockwise,
    /// Toward 180 degrees
    CounterClockwise,
}

impl Spin {
    /// Pulse width in microseconds within a 20 ms frame
    pub const fn pulse_us(&self) -> u16 {
        match self {
            Spin::Stop => 1500,
            Spin::Clockwise => 1000,
            Spin::CounterClockwise => 2000,
        }
    }
}

/// A planned move: spin this way for `run_ms`, then stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Move {
    pub spin: Spin,
    pub run_ms: u32,
}

impl Move {
    pub const IDLE: Move = Move {
        spin: Spin::Stop,
        run_ms: 0,
    };
}

/// Simulated positional servo on top of a continuous one
#[derive(Debug, Clone, Copy)]
pub struct ServoSim {
    rotation_time_ms: u32,
    /// Estimated horn angle in degrees
    angle: f32,
}

impl ServoSim {
    /// Create a model assuming the horn rests at 90 degrees
    pub fn new(rotation_time_ms: u32) -> Self {
        Self {
            rotation_time_ms: clamp_rotation(rotation_time_ms),
            angle: 90.0,
        }
    }

    pub fn rotation_time_ms(&self) -> u32 {
        self.rotation_time_ms
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Estimated speed at full drive
    pub fn deg_per_ms(&self) -> f32 {
        SWEEP_DEG / self.rotation_time_ms as f32
    }

    /// Plan the drive needed to reach `target` degrees and assume it happens
    pub fn plan_move(&mut self, target: f32) -> Move {
        let target = target.clamp(0.0, SWEEP_DEG);
        let delta = target - self.angle;
        let run_ms = ((if delta < 0.0 { -delta } else { delta }) / self.deg_per_ms() + 0.5) as u32;

        if run_ms == 0 {
            return Move::IDLE;
        }

        self.angle = target;
        Move {
            spin: if delta > 0.0 {
                Spin::CounterClockwise
            } else {
                Spin::Clockwise
            },
            run_ms,
        }
    }

    /// Take a measured half-turn time as the new calibration
    ///
    /// Returns the value actually adopted, clamped to the storable range.
    pub fn calibrate_from(&mut self, elapsed_ms: u32) -> u32 {
        self.rotation_time_ms = clamp_rotation(elapsed_ms);
        self.angle = SWEEP_DEG;
        self.rotation_time_ms
    }
}

fn clamp_rotation(ms: u32) -> u32 {
    ms.clamp(MIN_ROTATION_MS, MAX_ROTATION_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_from_rotation_time() {
        let servo = ServoSim::new(1000);
        assert!((servo.deg_per_ms() - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_plan_move_both_directions() {
        let mut servo = ServoSim::new(1000);

        let mv = servo.plan_move(180.0);
        assert_eq!(mv.spin, Spin::CounterClockwise);
        assert_eq!(mv.run_ms, 500);
        assert_eq!(servo.angle(), 180.0);

        let mv = servo.plan_move(0.0);
        assert_eq!(mv.spin, Spin::Clockwise);
        assert_eq!(mv.run_ms, 1000);
    }

    #[test]
    fn test_small_step_duration() {
        let mut servo = ServoSim::new(1800);
        // 0.1 deg/ms, 2 degrees -> 20 ms
        let mv = servo.plan_move(92.0);
        assert_eq!(mv.run_ms, 20);
    }

    #[test]
    fn test_no_move_when_on_target() {
        let mut servo = ServoSim::new(1000);
        assert_eq!(servo.plan_move(90.0), Move::IDLE);
    }

    #[test]
    fn test_target_clamped_to_sweep() {
        let mut servo = ServoSim::new(1000);
        servo.plan_move(270.0);
        assert_eq!(servo.angle(), 180.0);
    }

    #[test]
    fn test_calibration_clamped() {
        let mut servo = ServoSim::new(1000);
        assert_eq!(servo.calibrate_from(150), MIN_ROTATION_MS);
        assert_eq!(servo.calibrate_from(9000), MAX_ROTATION_MS);
        assert_eq!(servo.calibrate_from(1250), 1250);
        assert_eq!(servo.rotation_time_ms(), 1250);
    }

    #[test]
    fn test_pulse_widths() {
        assert_eq!(Spin::Stop.pulse_us(), 1500);
        assert_eq!(Spin::Clockwise.pulse_us(), 1000);
        assert_eq!(Spin::CounterClockwise.pulse_us(), 2000);
    }
}

//! Continuous servo on an RP2040 PWM slice
//!
//! The slice counts at 1 MHz (125 MHz / 125), so compare values are pulse
//! widths in microseconds and `top` sets the 20 ms frame.

use defmt::*;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Timer;

use embarca_core::servo::{Move, Spin, FRAME_US};

/// Integer clock divider giving 1 µs per count at 125 MHz
const PWM_DIVIDER: u8 = 125;

/// Servo on PWM channel A of its slice
pub struct PwmServo<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> PwmServo<'d> {
    /// Take the slice and hold the servo stopped
    pub fn new(mut pwm: Pwm<'d>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.into();
        config.top = (FRAME_US - 1) as u16;
        config.compare_a = Spin::Stop.pulse_us();
        pwm.set_config(&config);
        Self { pwm, config }
    }

    pub fn spin(&mut self, spin: Spin) {
        self.config.compare_a = spin.pulse_us();
        self.pwm.set_config(&self.config);
    }

    /// Run a planned move to completion and stop
    pub async fn execute(&mut self, mv: Move) {
        if mv.run_ms == 0 {
            return;
        }
        debug!("servo {} for {} ms", mv.spin, mv.run_ms);
        self.spin(mv.spin);
        Timer::after_millis(mv.run_ms as u64).await;
        self.spin(Spin::Stop);
    }
}

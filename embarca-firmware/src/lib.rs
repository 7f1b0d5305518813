//! Embarca - Pico W telemetry demo programs
//!
//! Shared board glue for the binaries under `src/bin/`:
//!
//! - `button-temp-mqtt`: button + onboard temperature, JSON over MQTT
//! - `button-temp-udp`: button + onboard temperature, text over UDP
//! - `joystick-udp`: joystick position and compass direction over UDP
//! - `tilt-servo`: MPU6050 tilt drives a continuous servo, OLED and buzzer alert

#![no_std]

pub mod config;
pub mod error;
pub mod mqtt;
pub mod servo;
pub mod udp;
pub mod wifi;

use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{I2C0, I2C1, PIO0};
use embassy_time::Timer;

pub use error::NetError;

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
    ADC_IRQ_FIFO => embassy_rp::adc::InterruptHandler;
    I2C0_IRQ => embassy_rp::i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => embassy_rp::i2c::InterruptHandler<I2C1>;
});

/// Park the program after a fatal init failure
pub async fn halt() -> ! {
    loop {
        Timer::after_secs(1).await;
    }
}

/// Milliseconds since boot
pub fn now_ms() -> u64 {
    embassy_time::Instant::now().as_millis()
}

//! Peripheral drivers for the Embarca firmware
//!
//! Drivers are written against `embedded-hal` / `embedded-hal-async`
//! traits so they can be exercised on the host with fake buses.

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod display;
pub mod imu;

#[cfg(test)]
pub(crate) mod testing;

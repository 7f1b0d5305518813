//! Inertial measurement units

pub mod mpu6050;

pub use mpu6050::{AccelRange, Mpu6050, Mpu6050Error, RawReading};

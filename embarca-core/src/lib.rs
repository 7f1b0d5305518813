//! Board-agnostic core logic for the Embarca firmware
//!
//! This crate contains all program logic that does not depend on
//! specific hardware implementations:
//!
//! - Calibration record persisted in one flash sector
//! - Onboard temperature sensor conversion and sampling
//! - Push-button, joystick and tilt interpretation
//! - Open-loop continuous servo model
//! - Telemetry payload formatting
//! - Broker link state machine

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod calibration;
pub mod joystick;
pub mod link;
pub mod payload;
pub mod servo;
pub mod temperature;
pub mod tilt;

//! RP2040-specific HAL for the Embarca firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `embarca-hal` traits:
//!
//! - Reserved calibration sector driver (implements `embarca_hal::SectorStorage`)
//! - ADC channel reader (implements `embarca_hal::AdcReader`)

#![no_std]

pub mod adc;
pub mod flash;

// Re-export shared traits from embarca-hal for convenience
pub use embarca_hal::{AdcReader, SectorStorage};

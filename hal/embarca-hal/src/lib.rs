//! Embarca Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the board-agnostic
//! logic in `embarca-core` is written against. The RP2040 implementations
//! live in `embarca-hal-rp2040`; host tests provide in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Programs (embarca-firmware bins)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embarca-core  ──►  embarca-hal traits  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!          ┌─────────────────────┐
//!          │ embarca-hal-rp2040  │
//!          └─────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::SectorStorage`] - One reserved, erasable flash sector
//! - [`adc::AdcReader`] - A single 12-bit ADC input

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod flash;

pub use adc::{AdcError, AdcReader};
pub use flash::{FlashError, SectorStorage};

//! Flash storage driver for RP2040
//!
//! Reserves the last 4KB erase sector of the 2MB Pico W flash for the
//! calibration record. Implements the `SectorStorage` trait from
//! `embarca-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::{NorFlash, ReadNorFlash};

// Re-export shared types from embarca-hal
pub use embarca_hal::flash::FlashError;
use embarca_hal::flash::check_bounds;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on Pico W
pub const SECTOR_SIZE: usize = ERASE_SIZE;
pub const SECTOR_START: u32 = (FLASH_SIZE - SECTOR_SIZE) as u32;

/// RP2040 reserved-sector storage
///
/// Accesses are offset into the last sector of flash, which the linker
/// script keeps out of the program image.
pub struct Rp2040Sector<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040Sector<'d> {
    /// Create a new sector storage instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl<'d> embarca_hal::SectorStorage for Rp2040Sector<'d> {
    const SECTOR_SIZE: usize = SECTOR_SIZE;

    async fn read(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), FlashError> {
        check_bounds(offset, buffer.len(), SECTOR_SIZE)?;
        ReadNorFlash::read(&mut self.flash, SECTOR_START + offset, buffer)
            .await
            .map_err(|_| FlashError::Read)
    }

    async fn erase(&mut self) -> Result<(), FlashError> {
        NorFlash::erase(&mut self.flash, SECTOR_START, SECTOR_START + SECTOR_SIZE as u32)
            .await
            .map_err(|_| FlashError::Erase)
    }

    async fn program(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
        check_bounds(offset, data.len(), SECTOR_SIZE)?;
        NorFlash::write(&mut self.flash, SECTOR_START + offset, data)
            .await
            .map_err(|_| FlashError::Program)
    }
}

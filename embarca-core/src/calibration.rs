//! Servo calibration record
//!
//! A single `{magic, rotation_time_ms}` record stored at the start of the
//! reserved flash sector. Every write erases the sector first; there is no
//! versioning and no rollback if power is lost between erase and program.

use embarca_hal::{FlashError, SectorStorage};

/// Magic number identifying a programmed calibration record
pub const CALIBRATION_MAGIC: u32 = 0xABCD_1234;

/// Shortest accepted half-turn time
pub const MIN_ROTATION_MS: u32 = 400;

/// Longest accepted half-turn time
pub const MAX_ROTATION_MS: u32 = 3000;

/// Half-turn time used when no valid record is stored
pub const DEFAULT_ROTATION_MS: u32 = 1000;

/// Serialized record size: magic + value, both u32 little-endian
pub const RECORD_SIZE: usize = 8;

/// Flash program granularity used for the write
pub const PAGE_SIZE: usize = 256;

/// Calibration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Flash operation failed
    Flash(FlashError),
    /// Value outside `MIN_ROTATION_MS..=MAX_ROTATION_MS`
    OutOfRange(u32),
}

impl From<FlashError> for CalibrationError {
    fn from(e: FlashError) -> Self {
        CalibrationError::Flash(e)
    }
}

/// Calibration record as laid out in flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationRecord {
    /// Must equal `CALIBRATION_MAGIC`
    pub magic: u32,
    /// Time for the servo to sweep 180 degrees
    pub rotation_time_ms: u32,
}

impl CalibrationRecord {
    /// Create a record carrying the current magic
    pub const fn new(rotation_time_ms: u32) -> Self {
        Self {
            magic: CALIBRATION_MAGIC,
            rotation_time_ms,
        }
    }

    /// Check magic and range
    pub fn is_valid(&self) -> bool {
        self.magic == CALIBRATION_MAGIC && is_in_range(self.rotation_time_ms)
    }

    /// Serialize to the flash layout
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..].copy_from_slice(&self.rotation_time_ms.to_le_bytes());
        bytes
    }

    /// Deserialize from the flash layout (no validation)
    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Self {
        Self {
            magic: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            rotation_time_ms: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

/// Whether `ms` is an acceptable rotation time
pub fn is_in_range(ms: u32) -> bool {
    (MIN_ROTATION_MS..=MAX_ROTATION_MS).contains(&ms)
}

/// Calibration store backed by a reserved flash sector
pub struct CalibrationStore<S> {
    storage: S,
}

impl<S: SectorStorage> CalibrationStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the stored rotation time
    ///
    /// Returns `None` for a blank sector, a bad magic, an out-of-range
    /// value or a flash read error.
    pub async fn read(&mut self) -> Option<u32> {
        let mut bytes = [0u8; RECORD_SIZE];
        if let Err(_e) = self.storage.read(0, &mut bytes).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("Calibration read failed: {:?}", _e);
            return None;
        }

        let record = CalibrationRecord::decode(&bytes);
        if record.is_valid() {
            Some(record.rotation_time_ms)
        } else {
            None
        }
    }

    /// Read the stored rotation time, or the default when absent
    pub async fn read_or_default(&mut self) -> u32 {
        self.read().await.unwrap_or(DEFAULT_ROTATION_MS)
    }

    /// Erase the sector and program a new record
    pub async fn write(&mut self, rotation_time_ms: u32) -> Result<(), CalibrationError> {
        if !is_in_range(rotation_time_ms) {
            return Err(CalibrationError::OutOfRange(rotation_time_ms));
        }

        let mut page = [0u8; PAGE_SIZE];
        page[..RECORD_SIZE].copy_from_slice(&CalibrationRecord::new(rotation_time_ms).encode());

        self.storage.erase().await?;
        self.storage.program(0, &page).await?;
        Ok(())
    }

    /// Give back the underlying storage
    pub fn release(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embarca_hal::flash::check_bounds;
    use proptest::prelude::*;

    /// In-memory sector behaving like NOR flash (program can only clear bits)
    pub struct RamSector {
        pub bytes: [u8; 4096],
        pub fail_read: bool,
        pub fail_erase: bool,
    }

    impl RamSector {
        pub fn blank() -> Self {
            Self {
                bytes: [0xFF; 4096],
                fail_read: false,
                fail_erase: false,
            }
        }
    }

    impl SectorStorage for RamSector {
        const SECTOR_SIZE: usize = 4096;

        async fn read(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), FlashError> {
            if self.fail_read {
                return Err(FlashError::Read);
            }
            check_bounds(offset, buffer.len(), Self::SECTOR_SIZE)?;
            let start = offset as usize;
            buffer.copy_from_slice(&self.bytes[start..start + buffer.len()]);
            Ok(())
        }

        async fn erase(&mut self) -> Result<(), FlashError> {
            if self.fail_erase {
                return Err(FlashError::Erase);
            }
            self.bytes.fill(0xFF);
            Ok(())
        }

        async fn program(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
            check_bounds(offset, data.len(), Self::SECTOR_SIZE)?;
            let start = offset as usize;
            for (cell, byte) in self.bytes[start..start + data.len()].iter_mut().zip(data) {
                *cell &= *byte;
            }
            Ok(())
        }
    }

    #[test]
    fn test_blank_sector_reads_none() {
        let mut store = CalibrationStore::new(RamSector::blank());
        assert_eq!(block_on(store.read()), None);
        assert_eq!(block_on(store.read_or_default()), DEFAULT_ROTATION_MS);
    }

    #[test]
    fn test_write_then_read() {
        let mut store = CalibrationStore::new(RamSector::blank());
        block_on(store.write(1234)).unwrap();
        assert_eq!(block_on(store.read()), Some(1234));
    }

    #[test]
    fn test_overwrite_replaces_previous_value() {
        let mut store = CalibrationStore::new(RamSector::blank());
        block_on(store.write(3000)).unwrap();
        block_on(store.write(400)).unwrap();
        assert_eq!(block_on(store.read()), Some(400));
    }

    #[test]
    fn test_corrupted_magic_reads_none() {
        for i in 0..4 {
            let mut store = CalibrationStore::new(RamSector::blank());
            block_on(store.write(1500)).unwrap();

            let mut sector = store.release();
            sector.bytes[i] ^= 0x01;
            let mut store = CalibrationStore::new(sector);
            assert_eq!(block_on(store.read()), None, "magic byte {} altered", i);
        }
    }

    #[test]
    fn test_out_of_range_value_in_flash_reads_none() {
        let mut sector = RamSector::blank();
        sector.bytes[..RECORD_SIZE].copy_from_slice(&CalibrationRecord::new(3001).encode());
        let mut store = CalibrationStore::new(sector);
        assert_eq!(block_on(store.read()), None);
    }

    #[test]
    fn test_write_rejects_out_of_range() {
        let mut store = CalibrationStore::new(RamSector::blank());
        assert_eq!(
            block_on(store.write(399)),
            Err(CalibrationError::OutOfRange(399))
        );
        assert_eq!(
            block_on(store.write(3001)),
            Err(CalibrationError::OutOfRange(3001))
        );
        assert_eq!(block_on(store.read()), None);
    }

    #[test]
    fn test_read_error_reads_none_and_falls_back_to_default() {
        let mut store = CalibrationStore::new(RamSector::blank());
        block_on(store.write(1500)).unwrap();

        let mut sector = store.release();
        sector.fail_read = true;
        let mut store = CalibrationStore::new(sector);
        assert_eq!(block_on(store.read()), None);
        assert_eq!(block_on(store.read_or_default()), DEFAULT_ROTATION_MS);
    }

    #[test]
    fn test_erase_failure_is_reported() {
        let mut sector = RamSector::blank();
        sector.fail_erase = true;
        let mut store = CalibrationStore::new(sector);
        assert_eq!(
            block_on(store.write(1000)),
            Err(CalibrationError::Flash(FlashError::Erase))
        );
    }

    #[test]
    fn test_record_layout_is_little_endian() {
        let bytes = CalibrationRecord::new(1000).encode();
        assert_eq!(bytes, [0x34, 0x12, 0xCD, 0xAB, 0xE8, 0x03, 0x00, 0x00]);
    }

    proptest! {
        #[test]
        fn prop_write_read_returns_value(d in MIN_ROTATION_MS..=MAX_ROTATION_MS) {
            let mut store = CalibrationStore::new(RamSector::blank());
            block_on(store.write(d)).unwrap();
            prop_assert_eq!(block_on(store.read()), Some(d));
        }
    }
}

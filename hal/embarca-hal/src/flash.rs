//! Flash storage abstractions
//!
//! The firmware reserves exactly one erase sector for persistent data.
//! There is no wear leveling and no key-value layer: callers erase the
//! whole sector and program it again on every write.

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Read operation failed
    Read,
    /// Erase operation failed
    Erase,
    /// Program (write) operation failed
    Program,
    /// Offset or length falls outside the reserved sector
    OutOfBounds,
}

/// A single reserved flash sector
///
/// Offsets are relative to the start of the sector. Implementations
/// must reject accesses that would leave it.
pub trait SectorStorage {
    /// Size of the reserved sector in bytes
    const SECTOR_SIZE: usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(
        &mut self,
        offset: u32,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Erase the whole sector (all bytes become 0xFF)
    fn erase(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Program `data` at `offset`
    ///
    /// The target range must have been erased first.
    fn program(
        &mut self,
        offset: u32,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

/// Check that `offset..offset + len` stays inside a sector of `sector_size` bytes
pub fn check_bounds(offset: u32, len: usize, sector_size: usize) -> Result<(), FlashError> {
    let end = (offset as usize).checked_add(len).ok_or(FlashError::OutOfBounds)?;
    if end > sector_size {
        return Err(FlashError::OutOfBounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_inside_sector() {
        assert_eq!(check_bounds(0, 8, 4096), Ok(()));
        assert_eq!(check_bounds(4088, 8, 4096), Ok(()));
        assert_eq!(check_bounds(0, 4096, 4096), Ok(()));
    }

    #[test]
    fn test_bounds_outside_sector() {
        assert_eq!(check_bounds(4090, 8, 4096), Err(FlashError::OutOfBounds));
        assert_eq!(check_bounds(u32::MAX, 8, 4096), Err(FlashError::OutOfBounds));
    }
}

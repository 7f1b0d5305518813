//! ADC input abstraction

/// Errors from ADC conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete or reported an error
    Conversion,
}

/// A single ADC input returning raw 12-bit samples (0-4095)
pub trait AdcReader {
    /// Take one conversion
    fn read(&mut self) -> impl core::future::Future<Output = Result<u16, AdcError>>;
}

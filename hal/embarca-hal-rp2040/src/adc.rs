//! ADC channel access
//!
//! Joystick axes sit on GPIO26/27; the temperature sensor is channel 4.

use embassy_rp::adc::{Adc, Async, Channel};

use embarca_hal::adc::AdcError;

/// One ADC channel borrowed together with the shared converter
///
/// The RP2040 has a single converter, so several inputs borrow it in turn.
pub struct AdcInput<'a, 'd> {
    adc: &'a mut Adc<'d, Async>,
    channel: &'a mut Channel<'d>,
}

impl<'a, 'd> AdcInput<'a, 'd> {
    pub fn new(adc: &'a mut Adc<'d, Async>, channel: &'a mut Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl embarca_hal::AdcReader for AdcInput<'_, '_> {
    async fn read(&mut self) -> Result<u16, AdcError> {
        self.adc
            .read(self.channel)
            .await
            .map_err(|_| AdcError::Conversion)
    }
}

//! Active buzzer on a GPIO

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Buzzer that sounds while its pin is high
pub struct Buzzer<P> {
    pin: P,
}

impl<P: OutputPin> Buzzer<P> {
    /// Wrap a pin and make sure the buzzer starts silent
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin })
    }

    pub fn on(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()
    }

    /// Sound for `duration_ms`, then go silent
    pub async fn beep<D: DelayNs>(&mut self, delay: &mut D, duration_ms: u32) -> Result<(), P::Error> {
        self.on()?;
        delay.delay_ms(duration_ms).await;
        self.off()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDelay, FakePin};
    use embassy_futures::block_on;

    #[test]
    fn test_starts_silent() {
        let buzzer = Buzzer::new(FakePin::new(true)).unwrap();
        assert!(!buzzer.pin.level);
    }

    #[test]
    fn test_beep_pulses_pin() {
        let mut buzzer = Buzzer::new(FakePin::new(false)).unwrap();
        let mut delay = FakeDelay::default();

        block_on(buzzer.beep(&mut delay, 100)).unwrap();

        assert!(!buzzer.pin.level);
        assert_eq!(buzzer.pin.rising_edges, 1);
        assert_eq!(delay.total_ns, 100_000_000);
    }
}

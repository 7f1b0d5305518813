//! RP2040 onboard temperature sensor
//!
//! The sensor is a biased diode on ADC channel 4. Its voltage falls
//! linearly with temperature: 0.706 V at 27 °C, -1.721 mV per degree.

use embedded_hal_async::delay::DelayNs;

use embarca_hal::{AdcError, AdcReader};

/// Default ADC reference voltage
pub const VREF: f32 = 3.3;

/// Default ADC resolution in bits
pub const ADC_BITS: u8 = 12;

/// Sensor voltage at 27 °C
const V_27C: f32 = 0.706;

/// Sensor slope in volts per degree
const SLOPE_V_PER_C: f32 = 0.001721;

/// Sensor read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    Adc(AdcError),
}

impl From<AdcError> for SensorError {
    fn from(e: AdcError) -> Self {
        SensorError::Adc(e)
    }
}

/// Convert a raw ADC count to volts
pub fn adc_to_volts(raw: f32, vref: f32, bits: u8) -> f32 {
    raw * vref / (1u32 << bits) as f32
}

/// Convert a raw ADC count from the onboard sensor to degrees Celsius
pub fn adc_to_celsius(raw: f32, vref: f32, bits: u8) -> f32 {
    27.0 - (adc_to_volts(raw, vref, bits) - V_27C) / SLOPE_V_PER_C
}

/// Averaging reader for the onboard sensor
#[derive(Debug, Clone, Copy)]
pub struct TemperatureSampler {
    /// Number of conversions averaged per reading (at least 1)
    samples: u8,
    /// Pause between conversions
    gap_ms: u32,
    vref: f32,
    bits: u8,
}

impl Default for TemperatureSampler {
    fn default() -> Self {
        Self::single()
    }
}

impl TemperatureSampler {
    /// One conversion per reading
    pub const fn single() -> Self {
        Self {
            samples: 1,
            gap_ms: 0,
            vref: VREF,
            bits: ADC_BITS,
        }
    }

    /// Average `samples` conversions taken `gap_ms` apart
    pub fn averaged(samples: u8, gap_ms: u32) -> Self {
        Self {
            samples: samples.max(1),
            gap_ms,
            vref: VREF,
            bits: ADC_BITS,
        }
    }

    pub fn samples(&self) -> u8 {
        self.samples
    }

    /// Take a reading in degrees Celsius
    pub async fn read_celsius<A, D>(&self, adc: &mut A, delay: &mut D) -> Result<f32, SensorError>
    where
        A: AdcReader,
        D: DelayNs,
    {
        let mut total: u32 = 0;
        for i in 0..self.samples {
            total += adc.read().await? as u32;
            if self.gap_ms > 0 && i + 1 < self.samples {
                delay.delay_ms(self.gap_ms).await;
            }
        }

        let mean = total as f32 / self.samples as f32;
        Ok(adc_to_celsius(mean, self.vref, self.bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    struct FixedAdc {
        values: &'static [u16],
        next: usize,
        reads: usize,
    }

    impl FixedAdc {
        fn new(values: &'static [u16]) -> Self {
            Self {
                values,
                next: 0,
                reads: 0,
            }
        }
    }

    impl AdcReader for FixedAdc {
        async fn read(&mut self) -> Result<u16, AdcError> {
            let v = self.values.get(self.next).copied().ok_or(AdcError::Conversion)?;
            self.next += 1;
            self.reads += 1;
            Ok(v)
        }
    }

    struct CountingDelay {
        total_ms: u32,
    }

    impl DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn test_midscale_reading() {
        // 1.65 V is far outside the sensor's working range; the formula
        // is linear and extrapolates accordingly.
        let t = adc_to_celsius(2048.0, VREF, ADC_BITS);
        assert!((t - (-521.518)).abs() < 0.01, "got {}", t);
    }

    #[test]
    fn test_room_temperature_count() {
        let t = adc_to_celsius(876.0, VREF, ADC_BITS);
        assert!((t - 27.14).abs() < 0.01, "got {}", t);
    }

    #[test]
    fn test_reference_point_is_27c() {
        // 0.706 V at 3.3 V / 4096 counts
        let raw = 0.706 * 4096.0 / 3.3;
        let t = adc_to_celsius(raw, VREF, ADC_BITS);
        assert!((t - 27.0).abs() < 0.001);
    }

    #[test]
    fn test_higher_count_means_colder() {
        assert!(adc_to_celsius(880.0, VREF, ADC_BITS) > adc_to_celsius(900.0, VREF, ADC_BITS));
    }

    #[test]
    fn test_averaged_reading() {
        let mut adc = FixedAdc::new(&[2040, 2044, 2048, 2052, 2056]);
        let mut delay = CountingDelay { total_ms: 0 };
        let sampler = TemperatureSampler::averaged(5, 2);

        let t = block_on(sampler.read_celsius(&mut adc, &mut delay)).unwrap();
        assert!((t - adc_to_celsius(2048.0, VREF, ADC_BITS)).abs() < 1e-4);
        assert_eq!(adc.reads, 5);
        // Gaps only between samples
        assert_eq!(delay.total_ms, 8);
    }

    #[test]
    fn test_single_sample_has_no_delay() {
        let mut adc = FixedAdc::new(&[2048]);
        let mut delay = CountingDelay { total_ms: 0 };
        let t = block_on(TemperatureSampler::single().read_celsius(&mut adc, &mut delay)).unwrap();
        assert!((t - adc_to_celsius(2048.0, VREF, ADC_BITS)).abs() < 1e-4);
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn test_adc_failure_fails_reading() {
        let mut adc = FixedAdc::new(&[2048, 2048]);
        let mut delay = CountingDelay { total_ms: 0 };
        let sampler = TemperatureSampler::averaged(3, 2);
        assert_eq!(
            block_on(sampler.read_celsius(&mut adc, &mut delay)),
            Err(SensorError::Adc(AdcError::Conversion))
        );
    }

    #[test]
    fn test_zero_samples_clamped_to_one() {
        assert_eq!(TemperatureSampler::averaged(0, 2).samples(), 1);
    }
}

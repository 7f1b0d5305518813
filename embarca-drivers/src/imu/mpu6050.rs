//! MPU6050 accelerometer / gyroscope over I2C
//!
//! Only the registers needed for raw polling are touched: power
//! management, identity, accelerometer range and the data block.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Default I2C address (AD0 low)
pub const MPU6050_ADDR: u8 = 0x68;

/// Accelerometer LSB per g at the ±2 g range
pub const ACCEL_SENS_2G: f32 = 16384.0;

/// WHO_AM_I values accepted as a working part
///
/// Genuine MPU6050s answer 0x68; the MPU6500-class clones fitted to many
/// boards answer 0x70 and are register compatible for raw polling.
pub const ACCEPTED_IDS: [u8; 2] = [0x68, 0x70];

mod reg {
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const WHO_AM_I: u8 = 0x75;
}

const DEVICE_RESET: u8 = 0x80;
const ACCEL_RANGE_SHIFT: u8 = 3;
const ACCEL_RANGE_MASK: u8 = 0b11 << ACCEL_RANGE_SHIFT;

/// MPU6050 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu6050Error<E> {
    /// Bus error
    I2c(E),
    /// WHO_AM_I returned an unexpected value
    UnknownDevice(u8),
    /// Accelerometer reads all zero (asleep or not wired)
    NoData,
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

impl AccelRange {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => AccelRange::G2,
            1 => AccelRange::G4,
            2 => AccelRange::G8,
            _ => AccelRange::G16,
        }
    }

    /// LSB per g
    pub fn sensitivity(&self) -> f32 {
        ACCEL_SENS_2G / (1u32 << (*self as u32)) as f32
    }
}

/// One raw sample, as signed register counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
    pub temp: i16,
}

impl RawReading {
    /// Acceleration in g for the given range
    pub fn accel_g(&self, range: AccelRange) -> [f32; 3] {
        let sens = range.sensitivity();
        self.accel.map(|v| v as f32 / sens)
    }

    /// Die temperature in °C
    pub fn temp_celsius(&self) -> f32 {
        self.temp as f32 / 340.0 + 36.53
    }
}

/// MPU6050 driver
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mpu6050<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, MPU6050_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(Mpu6050Error::I2c)
    }

    async fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(Mpu6050Error::I2c)
    }

    async fn read_triplet(&mut self, reg: u8) -> Result<[i16; 3], Mpu6050Error<I2C::Error>> {
        let mut buf = [0u8; 6];
        self.read_regs(reg, &mut buf).await?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }

    /// Reset the device and wake it from sleep
    pub async fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Mpu6050Error<I2C::Error>> {
        self.write_reg(reg::PWR_MGMT_1, DEVICE_RESET).await?;
        delay.delay_ms(100).await;
        self.write_reg(reg::PWR_MGMT_1, 0x00).await?;
        delay.delay_ms(10).await;
        Ok(())
    }

    /// Check identity and that the accelerometer produces data
    ///
    /// Returns the WHO_AM_I value.
    pub async fn probe(&mut self) -> Result<u8, Mpu6050Error<I2C::Error>> {
        let mut id = [0u8; 1];
        self.read_regs(reg::WHO_AM_I, &mut id).await?;
        if !ACCEPTED_IDS.contains(&id[0]) {
            return Err(Mpu6050Error::UnknownDevice(id[0]));
        }

        let accel = self.read_triplet(reg::ACCEL_XOUT_H).await?;
        if accel == [0; 3] {
            return Err(Mpu6050Error::NoData);
        }

        Ok(id[0])
    }

    /// Read accelerometer, gyroscope and temperature
    pub async fn read_raw(&mut self) -> Result<RawReading, Mpu6050Error<I2C::Error>> {
        let accel = self.read_triplet(reg::ACCEL_XOUT_H).await?;
        let gyro = self.read_triplet(reg::GYRO_XOUT_H).await?;

        let mut temp = [0u8; 2];
        self.read_regs(reg::TEMP_OUT_H, &mut temp).await?;

        Ok(RawReading {
            accel,
            gyro,
            temp: i16::from_be_bytes(temp),
        })
    }

    pub async fn set_accel_range(&mut self, range: AccelRange) -> Result<(), Mpu6050Error<I2C::Error>> {
        let mut config = [0u8; 1];
        self.read_regs(reg::ACCEL_CONFIG, &mut config).await?;
        let value = (config[0] & !ACCEL_RANGE_MASK) | ((range as u8) << ACCEL_RANGE_SHIFT);
        self.write_reg(reg::ACCEL_CONFIG, value).await
    }

    pub async fn accel_range(&mut self) -> Result<AccelRange, Mpu6050Error<I2C::Error>> {
        let mut config = [0u8; 1];
        self.read_regs(reg::ACCEL_CONFIG, &mut config).await?;
        Ok(AccelRange::from_bits(config[0] >> ACCEL_RANGE_SHIFT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDelay, FakeI2c};
    use embassy_futures::block_on;

    fn device(who_am_i: u8) -> FakeI2c {
        let mut bus = FakeI2c::new(MPU6050_ADDR);
        bus.regs[reg::WHO_AM_I as usize] = who_am_i;
        // AX = 0x4000 (1 g), AY = -2, AZ = 0x0100
        bus.regs[0x3B..0x41].copy_from_slice(&[0x40, 0x00, 0xFF, 0xFE, 0x01, 0x00]);
        // Temp = -340 counts
        bus.regs[0x41..0x43].copy_from_slice(&(-340i16).to_be_bytes());
        bus.regs[0x43..0x49].copy_from_slice(&[0x00, 0x10, 0x80, 0x00, 0x7F, 0xFF]);
        bus
    }

    #[test]
    fn test_reset_sequence() {
        let mut mpu = Mpu6050::new(device(0x68));
        let mut delay = FakeDelay::default();
        block_on(mpu.reset(&mut delay)).unwrap();

        let bus = mpu.release();
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0].as_slice(), &[0x6B, 0x80]);
        assert_eq!(bus.writes[1].as_slice(), &[0x6B, 0x00]);
        assert_eq!(delay.total_ns, 110_000_000);
    }

    #[test]
    fn test_probe_accepts_known_ids() {
        for id in ACCEPTED_IDS {
            let mut mpu = Mpu6050::new(device(id));
            assert_eq!(block_on(mpu.probe()), Ok(id));
        }
    }

    #[test]
    fn test_probe_rejects_unknown_id() {
        let mut mpu = Mpu6050::new(device(0x12));
        assert_eq!(block_on(mpu.probe()), Err(Mpu6050Error::UnknownDevice(0x12)));
    }

    #[test]
    fn test_probe_rejects_silent_accelerometer() {
        let mut bus = device(0x68);
        bus.regs[0x3B..0x41].fill(0);
        let mut mpu = Mpu6050::new(bus);
        assert_eq!(block_on(mpu.probe()), Err(Mpu6050Error::NoData));
    }

    #[test]
    fn test_probe_bus_error() {
        let mut bus = device(0x68);
        bus.fail = true;
        let mut mpu = Mpu6050::new(bus);
        assert!(matches!(block_on(mpu.probe()), Err(Mpu6050Error::I2c(_))));
    }

    #[test]
    fn test_read_raw_big_endian() {
        let mut mpu = Mpu6050::new(device(0x68));
        let raw = block_on(mpu.read_raw()).unwrap();

        assert_eq!(raw.accel, [16384, -2, 256]);
        assert_eq!(raw.gyro, [16, i16::MIN, i16::MAX]);
        assert_eq!(raw.temp, -340);

        let g = raw.accel_g(AccelRange::G2);
        assert_eq!(g[0], 1.0);
        assert!((raw.temp_celsius() - 35.53).abs() < 1e-4);
    }

    #[test]
    fn test_accel_range_bits() {
        let mut bus = device(0x68);
        // Self-test bits set; they must survive
        bus.regs[reg::ACCEL_CONFIG as usize] = 0xE0;
        let mut mpu = Mpu6050::new(bus);

        block_on(mpu.set_accel_range(AccelRange::G8)).unwrap();
        assert_eq!(block_on(mpu.accel_range()), Ok(AccelRange::G8));

        let bus = mpu.release();
        assert_eq!(bus.regs[reg::ACCEL_CONFIG as usize], 0xE0 | (2 << 3));
    }

    #[test]
    fn test_sensitivity_per_range() {
        assert_eq!(AccelRange::G2.sensitivity(), 16384.0);
        assert_eq!(AccelRange::G4.sensitivity(), 8192.0);
        assert_eq!(AccelRange::G16.sensitivity(), 2048.0);
    }
}

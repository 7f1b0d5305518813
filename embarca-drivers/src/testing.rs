//! Host fakes for driver tests

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType as I2cErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

/// Delay that only accumulates the requested time
#[derive(Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

/// Output pin that records its level
pub struct FakePin {
    pub level: bool,
    pub rising_edges: u32,
}

impl FakePin {
    pub fn new(level: bool) -> Self {
        Self {
            level,
            rising_edges: 0,
        }
    }
}

impl PinErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if !self.level {
            self.rising_edges += 1;
        }
        self.level = true;
        Ok(())
    }
}

/// Register-file I2C device
///
/// A write sets the register pointer from its first byte and stores the
/// rest; a read returns bytes from the pointer onward. Every write is
/// also kept in `writes` (truncated to 130 bytes).
pub struct FakeI2c {
    pub address: u8,
    pub regs: [u8; 256],
    pointer: u8,
    pub writes: Vec<Vec<u8, 130>, 64>,
    pub fail: bool,
}

impl FakeI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            pointer: 0,
            writes: Vec::new(),
            fail: false,
        }
    }
}

impl I2cErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        if self.fail || address != self.address {
            return Err(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let mut record = Vec::new();
                    let n = bytes.len().min(130);
                    let _ = record.extend_from_slice(&bytes[..n]);
                    let _ = self.writes.push(record);

                    if let Some((&reg, data)) = bytes.split_first() {
                        self.pointer = reg;
                        for (i, &b) in data.iter().enumerate() {
                            self.regs[reg.wrapping_add(i as u8) as usize] = b;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = self.regs[self.pointer.wrapping_add(i as u8) as usize];
                    }
                }
            }
        }
        Ok(())
    }
}

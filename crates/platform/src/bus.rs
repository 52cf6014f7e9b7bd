//! Two-wire bus abstraction
//!
//! Provides the addressed-transaction trait used by variant detection and
//! codec bring-up, plus the presence probe (an address-only write) and a
//! diagnostic scan. [`HalBus`] adapts any `embedded_hal_async::i2c::I2c`
//! implementation.

use embedded_hal_async::i2c::I2c;

/// I2C peripheral abstraction
pub trait I2cPeripheral {
    /// Error type
    type Error: core::fmt::Debug;

    /// Write to device
    fn write(
        &mut self,
        address: u8,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Write then read (repeated start)
    fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Configure I2C speed
    fn configure(&mut self, config: I2cConfig) -> Result<(), Self::Error>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Addressing mode
    pub address_mode: AddressMode,
}

impl I2cConfig {
    /// 7-bit addressing at the given clock rate.
    pub const fn at(frequency: u32) -> Self {
        Self {
            frequency,
            address_mode: AddressMode::SevenBit,
        }
    }
}

/// I2C addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressMode {
    /// 7-bit addressing
    SevenBit,
    /// 10-bit addressing
    TenBit,
}

/// Outcome of a single presence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeResult {
    /// Probed 7-bit address.
    pub address: u8,
    /// `true` if a device acknowledged its address.
    pub present: bool,
}

/// Probe for a device at `address` using an address-only write at
/// `frequency` Hz.
///
/// A bus that refuses the clock change reports the device absent.
pub async fn probe<B: I2cPeripheral>(bus: &mut B, address: u8, frequency: u32) -> ProbeResult {
    let present = match bus.configure(I2cConfig::at(frequency)) {
        Ok(()) => bus.write(address, &[]).await.is_ok(),
        Err(_) => false,
    };
    ProbeResult { address, present }
}

/// Lowest non-reserved 7-bit address.
pub const SCAN_FIRST: u8 = 0x08;
/// Highest non-reserved 7-bit address.
pub const SCAN_LAST: u8 = 0x77;

/// Probe every non-reserved address and collect the responders.
pub async fn scan<B: I2cPeripheral>(bus: &mut B, frequency: u32) -> heapless::Vec<u8, 112> {
    let mut found = heapless::Vec::new();
    for address in SCAN_FIRST..=SCAN_LAST {
        if probe(bus, address, frequency).await.present {
            // 112 slots cover the whole non-reserved range.
            found.push(address).ok();
        }
    }
    found
}

/// Adapter from an `embedded-hal-async` I2C driver to [`I2cPeripheral`].
///
/// `embedded-hal` has no clock-rate API, so [`I2cPeripheral::configure`]
/// only records the requested configuration; HALs that can retime the bus
/// implement [`I2cPeripheral`] directly.
pub struct HalBus<I> {
    i2c: I,
    config: I2cConfig,
}

impl<I: I2c> HalBus<I> {
    /// Wrap an I2C driver already configured for `initial` clock rate.
    pub fn new(i2c: I, initial: u32) -> Self {
        Self {
            i2c,
            config: I2cConfig::at(initial),
        }
    }

    /// Most recently requested configuration.
    pub fn config(&self) -> I2cConfig {
        self.config
    }

    /// Release the wrapped driver.
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> I2cPeripheral for HalBus<I> {
    type Error = I::Error;

    async fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, data).await
    }

    async fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(address, write, read).await
    }

    fn configure(&mut self, config: I2cConfig) -> Result<(), Self::Error> {
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::mocks::MockBus;

    #[tokio::test]
    async fn test_probe_reports_present_device() {
        let mut bus = MockBus::with_devices(&[0x18]);
        let result = probe(&mut bus, 0x18, 400_000).await;
        assert_eq!(result, ProbeResult { address: 0x18, present: true });
        assert_eq!(bus.frequency, 400_000);
    }

    #[tokio::test]
    async fn test_probe_reports_absent_device() {
        let mut bus = MockBus::with_devices(&[0x18]);
        assert!(!probe(&mut bus, 0x36, 100_000).await.present);
    }

    #[tokio::test]
    async fn test_scan_lists_all_responders_in_order() {
        let mut bus = MockBus::with_devices(&[0x58, 0x34, 0x36]);
        let found = scan(&mut bus, 100_000).await;
        assert_eq!(found.as_slice(), &[0x34, 0x36, 0x58]);
    }

    #[tokio::test]
    async fn test_scan_skips_reserved_addresses() {
        let mut bus = MockBus::with_devices(&[0x00, 0x7F]);
        assert!(scan(&mut bus, 100_000).await.is_empty());
    }
}

//! HalBus adapter tests against a scripted embedded-hal I2C mock.
//!
//! Run with: cargo test -p platform --test bus_adapter

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
use platform::bus::{probe, HalBus, I2cPeripheral};

#[tokio::test]
async fn hal_bus_probe_is_an_address_only_write() {
    let expectations = [Transaction::write(0x18, vec![])];
    let mut bus = HalBus::new(I2cMock::new(&expectations), 100_000);

    let result = probe(&mut bus, 0x18, 400_000).await;
    assert!(result.present);
    assert_eq!(bus.config().frequency, 400_000);

    bus.into_inner().done();
}

#[tokio::test]
async fn hal_bus_forwards_register_write_and_read() {
    let expectations = [
        Transaction::write(0x18, vec![0x00, 0x80]),
        Transaction::write_read(0x58, vec![0x02], vec![0x04]),
    ];
    let mut bus = HalBus::new(I2cMock::new(&expectations), 400_000);

    bus.write(0x18, &[0x00, 0x80]).await.unwrap();
    let mut value = [0u8; 1];
    bus.write_read(0x58, &[0x02], &mut value).await.unwrap();
    assert_eq!(value[0], 0x04);

    bus.into_inner().done();
}

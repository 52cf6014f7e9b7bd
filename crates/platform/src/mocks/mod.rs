//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests and by the desktop simulator.

#![cfg(any(test, feature = "std"))]

use core::ops::ControlFlow;
use std::string::{String, ToString};
use std::vec::Vec;

use crate::bus::{I2cConfig, I2cPeripheral};
use crate::*;

// ── Two-wire bus ─────────────────────────────────────────────────────────────

/// One register write seen by [`MockBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusWrite {
    /// Target address
    pub address: u8,
    /// Bytes written (register first)
    pub data: Vec<u8>,
    /// Bus clock in effect when the write was issued
    pub frequency: u32,
}

/// Error returned by [`MockBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    /// No device acknowledged the address, or a failure was injected
    Nack(u8),
    /// Clock change refused
    Refused,
}

/// Mock two-wire bus with a fixed set of responding addresses.
///
/// Address-only writes are presence probes and land in `probes`; writes
/// carrying data land in `writes`.
pub struct MockBus {
    devices: Vec<u8>,
    /// Current bus clock
    pub frequency: u32,
    /// Number of successful `configure` calls
    pub configure_count: u32,
    /// Presence probes issued, with the clock in effect
    pub probes: Vec<(u8, u32)>,
    /// Data writes that were acknowledged
    pub writes: Vec<BusWrite>,
    /// Canned register contents returned by `write_read`
    pub registers: Vec<(u8, u8, u8)>,
    /// Injected failures: `(address, register)`; `None` fails every write
    pub failing_writes: Vec<(u8, Option<u8>)>,
    /// Reject every clock change
    pub refuse_configure: bool,
    /// Reject clock changes once this many have succeeded
    pub configure_limit: Option<u32>,
}

impl MockBus {
    /// Bus on which only `devices` acknowledge.
    pub fn with_devices(devices: &[u8]) -> Self {
        Self {
            devices: devices.to_vec(),
            frequency: 100_000,
            configure_count: 0,
            probes: Vec::new(),
            writes: Vec::new(),
            registers: Vec::new(),
            failing_writes: Vec::new(),
            refuse_configure: false,
            configure_limit: None,
        }
    }

    /// Make writes to `register` at `address` fail.
    pub fn fail_register(&mut self, address: u8, register: u8) {
        self.failing_writes.push((address, Some(register)));
    }

    /// Make every data write to `address` fail while probes still succeed.
    pub fn fail_all_writes(&mut self, address: u8) {
        self.failing_writes.push((address, None));
    }

    /// Seed the value returned when `register` at `address` is read.
    pub fn set_register(&mut self, address: u8, register: u8, value: u8) {
        self.registers.retain(|&(a, r, _)| !(a == address && r == register));
        self.registers.push((address, register, value));
    }

    /// Writes addressed to `address`, in order.
    pub fn writes_to(&self, address: u8) -> Vec<&BusWrite> {
        self.writes.iter().filter(|w| w.address == address).collect()
    }

    fn injected_failure(&self, address: u8, data: &[u8]) -> bool {
        self.failing_writes.iter().any(|&(a, reg)| {
            a == address && (reg.is_none() || reg == data.first().copied())
        })
    }
}

impl I2cPeripheral for MockBus {
    type Error = MockBusError;

    async fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            self.probes.push((address, self.frequency));
        }
        if !self.devices.contains(&address) {
            return Err(MockBusError::Nack(address));
        }
        if data.is_empty() {
            return Ok(());
        }
        if self.injected_failure(address, data) {
            return Err(MockBusError::Nack(address));
        }
        self.writes.push(BusWrite {
            address,
            data: data.to_vec(),
            frequency: self.frequency,
        });
        Ok(())
    }

    async fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        if !self.devices.contains(&address) {
            return Err(MockBusError::Nack(address));
        }
        let register = write.first().copied();
        for (offset, byte) in read.iter_mut().enumerate() {
            let reg = register.and_then(|r| u8::try_from(offset).ok().map(|o| r.wrapping_add(o)));
            *byte = self
                .registers
                .iter()
                .find(|&&(a, r, _)| a == address && Some(r) == reg)
                .map_or(0, |&(_, _, v)| v);
        }
        Ok(())
    }

    fn configure(&mut self, config: I2cConfig) -> Result<(), Self::Error> {
        let spent = self.configure_limit.is_some_and(|n| self.configure_count >= n);
        if self.refuse_configure || spent {
            return Err(MockBusError::Refused);
        }
        self.frequency = config.frequency;
        self.configure_count = self.configure_count.saturating_add(1);
        Ok(())
    }
}

// ── Delay and pins ───────────────────────────────────────────────────────────

/// Delay that returns immediately and accounts for the time requested.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Sum of all requested delays, in nanoseconds
    pub total_ns: u64,
    /// Number of delay calls
    pub calls: u32,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in whole milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }

    fn record(&mut self, ns: u64) {
        self.total_ns = self.total_ns.saturating_add(ns);
        self.calls = self.calls.saturating_add(1);
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us).saturating_mul(1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000_000));
    }
}

/// Digital pin usable as input or output.
#[derive(Debug, Clone)]
pub struct MockPin {
    /// Current level
    pub level: PinState,
    /// Every level driven through `OutputPin`, in order
    pub history: Vec<PinState>,
}

impl MockPin {
    /// Pin reading `level`.
    pub fn new(level: PinState) -> Self {
        Self {
            level,
            history: Vec::new(),
        }
    }

    /// Externally change what the pin reads.
    pub fn set_level(&mut self, level: PinState) {
        self.level = level;
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level = PinState::Low;
        self.history.push(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level = PinState::High;
        self.history.push(PinState::High);
        Ok(())
    }
}

impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level == PinState::Low)
    }
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Mock input device
pub struct MockInput {
    keys: heapless::Deque<Key, 16>,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            keys: heapless::Deque::new(),
        }
    }

    /// Add key to queue
    pub fn push_key(&mut self, key: Key) -> Result<(), Key> {
        self.keys.push_back(key)
    }

    /// Clear all keys
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for MockInput {
    async fn wait_for_key(&mut self) -> Key {
        loop {
            if let Some(key) = self.keys.pop_front() {
                return key;
            }
            embassy_time::Timer::after_millis(10).await;
        }
    }

    fn poll_key(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }
}

// ── Audio ────────────────────────────────────────────────────────────────────

/// Mock decode/output engine.
///
/// Each opened source runs for `steps_per_track` calls to `step` and then
/// reports itself finished.
pub struct MockTransport {
    running: bool,
    remaining: u32,
    /// Steps a source lasts once opened
    pub steps_per_track: u32,
    /// Sources the engine refuses to open
    pub rejected: Vec<String>,
    /// Every source passed to `open`, in order
    pub opened: Vec<String>,
    /// Number of `stop` calls
    pub stop_count: u32,
    /// Number of `step` calls
    pub step_count: u32,
    /// Last gain set
    pub volume: Option<Volume>,
    /// Last pinout set
    pub pinout: Option<I2sPins>,
}

impl MockTransport {
    /// Engine whose tracks each last `steps_per_track` steps.
    pub fn new(steps_per_track: u32) -> Self {
        Self {
            running: false,
            remaining: 0,
            steps_per_track,
            rejected: Vec::new(),
            opened: Vec::new(),
            stop_count: 0,
            step_count: 0,
            volume: None,
            pinout: None,
        }
    }

    /// Refuse to open `source`.
    pub fn reject(&mut self, source: &str) {
        self.rejected.push(source.to_string());
    }

    /// Source most recently opened
    pub fn last_opened(&self) -> Option<&str> {
        self.opened.last().map(String::as_str)
    }

    /// End the current source on the next `is_running` check.
    pub fn finish_current(&mut self) {
        self.running = false;
        self.remaining = 0;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new(u32::MAX)
    }
}

impl Transport for MockTransport {
    async fn open(&mut self, source: &str) -> bool {
        self.opened.push(source.to_string());
        if self.rejected.iter().any(|r| r == source) {
            self.running = false;
            return false;
        }
        self.running = true;
        self.remaining = self.steps_per_track;
        true
    }

    async fn stop(&mut self) {
        self.running = false;
        self.stop_count = self.stop_count.saturating_add(1);
    }

    async fn step(&mut self) {
        self.step_count = self.step_count.saturating_add(1);
        if self.running {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.running = false;
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = Some(volume);
    }

    fn set_pinout(&mut self, pins: I2sPins) {
        self.pinout = Some(pins);
    }
}

/// Error returned by [`MockPcmOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPcmError;

/// Mock raw sample sink
#[derive(Debug, Default)]
pub struct MockPcmOutput {
    /// Format and pins passed to the last `start`
    pub started: Option<(OutputFormat, I2sPins)>,
    /// Number of `write` calls
    pub writes: u32,
    /// Total samples written
    pub samples_written: usize,
    /// Number of `release` calls
    pub releases: u32,
    /// Make `start` fail
    pub fail_start: bool,
}

impl MockPcmOutput {
    /// Create a new mock sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl PcmOutput for MockPcmOutput {
    type Error = MockPcmError;

    async fn start(&mut self, format: OutputFormat, pins: I2sPins) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(MockPcmError);
        }
        self.started = Some((format, pins));
        Ok(())
    }

    async fn write(&mut self, samples: &[i16]) -> Result<(), Self::Error> {
        if self.started.is_none() {
            return Err(MockPcmError);
        }
        self.writes = self.writes.saturating_add(1);
        self.samples_written = self.samples_written.saturating_add(samples.len());
        Ok(())
    }

    async fn release(&mut self) {
        self.started = None;
        self.releases = self.releases.saturating_add(1);
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

/// Error returned by [`MockStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStorageError {
    /// No medium inserted
    NoMedium,
    /// Directory does not exist
    NotFound,
}

/// In-memory directory tree.
///
/// Entries list in insertion order. Adding a file creates its parent
/// folders.
pub struct MockStorage {
    entries: Vec<(String, bool)>,
    /// `false` simulates an empty card slot
    pub present: bool,
    /// Number of `read_dir` calls
    pub listings: u32,
}

impl MockStorage {
    /// Empty medium containing only `/`.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            present: true,
            listings: 0,
        }
    }

    /// Card slot with nothing in it.
    pub fn missing() -> Self {
        Self {
            present: false,
            ..Self::new()
        }
    }

    /// Add a folder (and its ancestors).
    #[must_use]
    pub fn with_dir(mut self, path: &str) -> Self {
        self.insert(path, true);
        self
    }

    /// Add a file (and its ancestor folders).
    #[must_use]
    pub fn with_file(mut self, path: &str) -> Self {
        self.insert(path, false);
        self
    }

    fn insert(&mut self, path: &str, is_dir: bool) {
        let parent = parent_of(path);
        if parent != "/" && !self.contains(parent) {
            self.insert(parent, true);
        }
        if !self.contains(path) {
            self.entries.push((path.to_string(), is_dir));
        }
    }

    fn contains(&self, path: &str) -> bool {
        path == "/" || self.entries.iter().any(|(p, _)| p == path)
    }

    fn is_dir(&self, path: &str) -> bool {
        path == "/" || self.entries.iter().any(|(p, d)| p == path && *d)
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn parent_of(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}

impl Storage for MockStorage {
    type Error = MockStorageError;

    async fn mount(&mut self) -> Result<(), Self::Error> {
        if self.present {
            Ok(())
        } else {
            Err(MockStorageError::NoMedium)
        }
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        if !self.present {
            return Err(MockStorageError::NoMedium);
        }
        Ok(self.contains(path))
    }

    async fn read_dir<F>(&mut self, path: &str, mut visit: F) -> Result<(), Self::Error>
    where
        F: FnMut(DirEntry<'_>) -> ControlFlow<()>,
    {
        if !self.present {
            return Err(MockStorageError::NoMedium);
        }
        if !self.is_dir(path) {
            return Err(MockStorageError::NotFound);
        }
        self.listings = self.listings.saturating_add(1);
        for (full, is_dir) in &self.entries {
            if parent_of(full) != path {
                continue;
            }
            let name = full.rsplit('/').next().unwrap_or(full);
            if visit(DirEntry { name, is_dir: *is_dir }).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_bus_records_probes_and_writes() {
        let mut bus = MockBus::with_devices(&[0x18]);
        bus.configure(I2cConfig::at(400_000)).unwrap();
        bus.write(0x18, &[]).await.unwrap();
        bus.write(0x18, &[0x01, 0x3F]).await.unwrap();
        assert!(bus.write(0x36, &[]).await.is_err());

        assert_eq!(bus.probes, vec![(0x18, 400_000), (0x36, 400_000)]);
        assert_eq!(bus.writes.len(), 1);
        assert_eq!(bus.writes[0].data, vec![0x01, 0x3F]);
    }

    #[test]
    fn test_mock_bus_configure_limit() {
        let mut bus = MockBus::with_devices(&[]);
        bus.configure_limit = Some(1);
        bus.configure(I2cConfig::at(400_000)).unwrap();
        assert_eq!(bus.configure(I2cConfig::at(100_000)), Err(MockBusError::Refused));
        assert_eq!(bus.frequency, 400_000);
        assert_eq!(bus.configure_count, 1);
    }

    #[tokio::test]
    async fn test_mock_bus_injected_failure_only_hits_register() {
        let mut bus = MockBus::with_devices(&[0x18]);
        bus.fail_register(0x18, 0x0D);
        assert!(bus.write(0x18, &[0x0D, 0x01]).await.is_err());
        assert!(bus.write(0x18, &[0x0E, 0x02]).await.is_ok());
        assert!(bus.write(0x18, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_bus_reads_seeded_register() {
        let mut bus = MockBus::with_devices(&[0x58]);
        bus.set_register(0x58, 0x02, 0b1010);
        let mut buf = [0u8; 1];
        bus.write_read(0x58, &[0x02], &mut buf).await.unwrap();
        assert_eq!(buf[0], 0b1010);
    }

    #[tokio::test]
    async fn test_mock_input() {
        let mut input = MockInput::new();

        input.push_key(Key::TogglePlay).unwrap();
        input.push_key(Key::NextTrack).unwrap();

        assert_eq!(input.poll_key(), Some(Key::TogglePlay));
        assert_eq!(input.wait_for_key().await, Key::NextTrack);
        assert_eq!(input.poll_key(), None);
    }

    #[tokio::test]
    async fn test_mock_transport_runs_for_fixed_steps() {
        let mut transport = MockTransport::new(2);
        assert!(transport.open("/a.mp3").await);
        assert!(transport.is_running());
        transport.step().await;
        assert!(transport.is_running());
        transport.step().await;
        assert!(!transport.is_running());
    }

    #[tokio::test]
    async fn test_mock_transport_rejects_listed_source() {
        let mut transport = MockTransport::default();
        transport.reject("/bad.mp3");
        assert!(!transport.open("/bad.mp3").await);
        assert!(!transport.is_running());
        assert_eq!(transport.last_opened(), Some("/bad.mp3"));
    }

    #[tokio::test]
    async fn test_mock_storage_lists_children_only() {
        let mut storage = MockStorage::new()
            .with_file("/Album/01.mp3")
            .with_file("/Album/Disc2/02.mp3")
            .with_file("/top.wav");

        let mut names = Vec::new();
        storage
            .read_dir("/Album", |e| {
                names.push((e.name.to_string(), e.is_dir));
                ControlFlow::Continue(())
            })
            .await
            .unwrap();
        assert_eq!(
            names,
            vec![("01.mp3".to_string(), false), ("Disc2".to_string(), true)]
        );
        assert!(storage.exists("/Album/Disc2").await.unwrap());
        assert_eq!(
            storage.read_dir("/top.wav", |_| ControlFlow::Continue(())).await,
            Err(MockStorageError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_mock_storage_missing_medium() {
        let mut storage = MockStorage::missing();
        assert_eq!(storage.mount().await, Err(MockStorageError::NoMedium));
    }

    #[tokio::test]
    async fn test_mock_delay_accumulates() {
        use embedded_hal_async::delay::DelayNs;
        let mut delay = MockDelay::new();
        delay.delay_ms(2).await;
        delay.delay_ms(3).await;
        assert_eq!(delay.total_ms(), 5);
        assert_eq!(delay.calls, 2);
    }

    #[test]
    fn test_mock_pin_tracks_output_history() {
        use embedded_hal::digital::{InputPin, OutputPin};
        let mut pin = MockPin::new(PinState::High);
        pin.set_low().unwrap();
        pin.set_high().unwrap();
        assert!(pin.is_high().unwrap());
        assert_eq!(pin.history, vec![PinState::Low, PinState::High]);
    }
}

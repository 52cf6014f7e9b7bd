//! Desktop stand-ins for the hardware, used by the `simulator` binary.
//!
//! - [`SimHardware`] / [`sim_bus`]: which chips answer on the simulated bus
//! - [`SimTransport`]: "plays" a file for a size-proportional number of steps
//! - [`StdinKeys`]: keyboard fed from stdin, one line at a time
//! - [`LogRenderer`]: frames as log lines, emitted only when they change

mod input;
mod renderer;
mod transport;

pub use input::StdinKeys;
pub use renderer::LogRenderer;
pub use transport::SimTransport;

use platform::board_config::I2cAddresses;
use platform::mocks::MockBus;

/// Hardware populated on the simulated bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SimHardware {
    /// Keyboard controller and ES8311 codec.
    Advanced,
    /// AW88298 amplifier and AW9523 expander.
    Standard,
    /// Nothing answers.
    None,
}

/// A bus on which the chips of `hardware` acknowledge.
pub fn sim_bus(hardware: SimHardware) -> MockBus {
    let devices: &[u8] = match hardware {
        SimHardware::Advanced => &[
            I2cAddresses::TCA8418_KEYBOARD.get(),
            I2cAddresses::ES8311_CODEC.get(),
        ],
        SimHardware::Standard => &[
            I2cAddresses::AW88298_AMP.get(),
            I2cAddresses::AW9523_EXPANDER.get(),
        ],
        SimHardware::None => &[],
    };
    MockBus::with_devices(devices)
}

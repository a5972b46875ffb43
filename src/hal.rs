//! Hardware capabilities the driver needs beyond plain `embedded-hal` pins.

use embedded_hal::digital::{InputPin, OutputPin};

/// Direction of the bidirectional data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Pull resistor configuration of the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    Up,
    None,
}

/// A single GPIO used as the AM2302 data line.
///
/// Level reads and writes come from the `embedded-hal` pin traits. Direction and pull
/// mode are reconfigured during every capture, which `embedded-hal` does not cover.
pub trait DataLine: InputPin + OutputPin {
    /// The GPIO number, used for diagnostics.
    fn pin_number(&self) -> u8;

    /// Whether the pin can be driven at all. Some pads (e.g. GPIO34-39 on the ESP32)
    /// are input-only.
    fn is_output_capable(&self) -> bool;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    fn set_pull(&mut self, pull: Pull) -> Result<(), Self::Error>;
}

/// Time sources used by the driver.
pub trait Clock {
    /// Monotonic microsecond counter. Busy-polled during a capture.
    fn now_us(&self) -> i64;

    /// Coarse scheduler tick counter. Allowed to wrap.
    fn now_ticks(&self) -> u32;

    /// Frequency of [`Clock::now_ticks`].
    fn tick_rate_hz(&self) -> u32;

    /// Converts milliseconds to ticks, rounding down.
    fn ms_to_ticks(&self, ms: u32) -> u32 {
        (u64::from(ms) * u64::from(self.tick_rate_hz()) / 1000) as u32
    }
}

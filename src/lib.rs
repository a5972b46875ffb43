//! AM2302 (DHT22) Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the AM2302 (DHT22) temperature
//! and humidity sensor. The sensor answers a start signal with 82 pulses on a single
//! bidirectional wire; the driver times every pulse against a microsecond clock and
//! decodes the 40-bit frame (humidity, temperature, checksum) from the pulse widths.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Pulse capture inside a [`critical-section`], so interrupts cannot distort timing
//! - Built-in rate limiting: reads closer than two seconds apart return the last good value
//! - Designed for `no_std` environments
//!
//! # Dependencies
//! The driver needs:
//! - a [`DataLine`]: an [`InputPin`] and [`OutputPin`] that can also switch direction and pull-up
//! - a [`Clock`]: a monotonic microsecond counter and a coarse tick counter. The microsecond
//!   counter is busy-polled for every wait, including the 1 ms start signal
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and emits diagnostics through `defmt`
//! - `std`: Implements `std::error::Error` for [`DhtError`]
//!
//! [`critical-section`]: https://docs.rs/critical-section
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod hal;
pub mod pulse;
pub mod reading;
pub mod sensor;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::DhtError;
pub use frame::PulseFrame;
pub use hal::{Clock, DataLine, Direction, Pull};
pub use reading::{RawReading, Reading};
pub use sensor::{Am2302, ReadSource, SensorState};

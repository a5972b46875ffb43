use core::fmt;

/// Possible errors from the AM2302 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The data pin can only be used as an input and cannot drive the start signal.
    InputOnlyPin,
    /// Timed out waiting for a pin state change, or a pulse lasted too long.
    Timeout,
    /// One of the two handshake pulses was outside the accepted width window.
    InitOutOfRange {
        /// Position of the pulse in the frame (0 = low phase, 1 = high phase).
        index: usize,
        /// Measured width in microseconds.
        width_us: u32,
    },
    /// Checksum did not match the received data.
    ChecksumMismatch {
        /// Checksum byte transmitted by the sensor.
        expected: u8,
        /// Checksum computed over the received humidity and temperature bytes.
        calculated: u8,
    },
    /// Polled before the minimum interval elapsed and no earlier reading is cached.
    TooSoon,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> DhtError<E> {
    /// Short name of the error kind, suitable for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            DhtError::InputOnlyPin => "input-only pin",
            DhtError::Timeout => "timeout",
            DhtError::InitOutOfRange { .. } => "init pulse out of range",
            DhtError::ChecksumMismatch { .. } => "checksum mismatch",
            DhtError::TooSoon => "too soon",
            DhtError::PinError(_) => "pin error",
        }
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::InputOnlyPin => f.write_str("Data pin is input-only and cannot be driven"),
            DhtError::Timeout => f.write_str("Timed out waiting for a pulse"),
            DhtError::InitOutOfRange { index, width_us } => write!(
                f,
                "Init response pulse {} was {}us wide (expected 65-85us)",
                index, width_us
            ),
            DhtError::ChecksumMismatch {
                expected,
                calculated,
            } => write!(
                f,
                "Data read was corrupt (expected checksum {:#04x}, calculated {:#04x})",
                expected, calculated
            ),
            DhtError::TooSoon => f.write_str("Read requested before the minimum interval elapsed"),
            DhtError::PinError(err) => write!(f, "HAL pin error: {:?}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for DhtError<E> {}

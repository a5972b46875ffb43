use crate::{error::DhtError, reading::RawReading};

/// Number of pulses in a complete frame: the init response pair plus 40 bit pairs.
pub const FRAME_PULSES: usize = 82;

/// Accepted width window for both init response pulses, in microseconds.
const INIT_PULSE_MIN_US: u32 = 65;
const INIT_PULSE_MAX_US: u32 = 85;

/// High phases at least this long (in microseconds) encode a 1 bit.
const ONE_BIT_THRESHOLD_US: u32 = 35;

/// Pulse widths captured during one read, in microseconds.
///
/// Even indices are low phases and odd indices are high phases. Pulses 0 and 1 are the
/// sensor's init response; pulses 2-81 carry 40 data bits, MSB first: humidity (16),
/// temperature (16), checksum (8).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseFrame {
    widths: [u32; FRAME_PULSES],
}

impl PulseFrame {
    pub const fn new(widths: [u32; FRAME_PULSES]) -> Self {
        PulseFrame { widths }
    }

    pub fn widths(&self) -> &[u32; FRAME_PULSES] {
        &self.widths
    }

    /// Checks both init response pulses against the accepted window.
    pub fn validate_init<E>(&self) -> Result<(), DhtError<E>> {
        for (index, &width_us) in self.widths[..2].iter().enumerate() {
            if !(INIT_PULSE_MIN_US..=INIT_PULSE_MAX_US).contains(&width_us) {
                return Err(DhtError::InitOutOfRange { index, width_us });
            }
        }
        Ok(())
    }

    /// Validates the frame and decodes the humidity and temperature it carries.
    ///
    /// # Returns
    ///
    /// * `Ok(RawReading)` if the init response is in range and the checksum matches
    /// * `Err(DhtError::InitOutOfRange)` or `Err(DhtError::ChecksumMismatch)` otherwise
    pub fn decode<E>(&self) -> Result<RawReading, DhtError<E>> {
        self.validate_init::<E>()?;

        let humidity = self.field(0, 16);
        let temperature = self.field(16, 16);
        let expected = self.field(32, 8) as u8;

        let calculated = checksum(humidity, temperature);
        if calculated != expected {
            return Err(DhtError::ChecksumMismatch {
                expected,
                calculated,
            });
        }

        Ok(RawReading::from_words(humidity, temperature))
    }

    /// Data bits in transmission order, judged by the width of each high phase.
    fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.widths[2..]
            .chunks_exact(2)
            .map(|pair| pair[1] >= ONE_BIT_THRESHOLD_US)
    }

    /// Assembles `len` bits starting at data bit `first` into a word, MSB first.
    fn field(&self, first: usize, len: usize) -> u16 {
        self.bits()
            .skip(first)
            .take(len)
            .fold(0, |word, bit| (word << 1) | u16::from(bit))
    }
}

/// Sum of the four data bytes, modulo 256.
pub fn checksum(humidity: u16, temperature: u16) -> u8 {
    let [hum_hi, hum_lo] = humidity.to_be_bytes();
    let [temp_hi, temp_lo] = temperature.to_be_bytes();

    [hum_hi, hum_lo, temp_hi, temp_lo]
        .iter()
        .fold(0u8, |sum, v| sum.wrapping_add(*v))
}

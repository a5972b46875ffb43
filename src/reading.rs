/// Reading returned by the AM2302 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

/// Decoded sensor values in tenths of a unit, exactly as transmitted.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawReading {
    /// Relative humidity in tenths of a percent.
    pub humidity: u16,
    /// Temperature in tenths of a degree Celsius.
    pub temperature: i16,
}

impl RawReading {
    /// Builds a reading from the two 16-bit words of a frame.
    ///
    /// The temperature word is sign-magnitude: bit 15 flags a negative value and
    /// bits 0-14 hold the magnitude.
    pub fn from_words(humidity: u16, temperature: u16) -> Self {
        let magnitude = (temperature & 0x7fff) as i16;
        let temperature = if temperature & 0x8000 != 0 {
            -magnitude
        } else {
            magnitude
        };

        RawReading {
            humidity,
            temperature,
        }
    }

    /// Scales the tenths values to floating point units.
    pub fn to_reading(self) -> Reading {
        Reading {
            temperature: f32::from(self.temperature) / 10.0,
            relative_humidity: f32::from(self.humidity) / 10.0,
        }
    }
}

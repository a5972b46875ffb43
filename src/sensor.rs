use crate::{
    config::Config,
    decoder::Decoder,
    error::DhtError,
    hal::{Clock, DataLine},
    reading::{RawReading, Reading},
};

/// Per-sensor bookkeeping carried between reads.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorState {
    pin: u8,
    active_high_init: bool,
    last: Option<RawReading>,
    last_read_time: Option<u32>,
}

impl SensorState {
    pub const fn new(pin: u8, active_high_init: bool) -> Self {
        SensorState {
            pin,
            active_high_init,
            last: None,
            last_read_time: None,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn active_high_init(&self) -> bool {
        self.active_high_init
    }

    /// Whether a checksum-valid reading has been captured.
    pub fn last_valid(&self) -> bool {
        self.last.is_some()
    }

    /// The most recent checksum-valid reading, in tenths.
    pub fn last_raw(&self) -> Option<RawReading> {
        self.last
    }

    /// Tick count at the end of the most recent capture attempt, successful or not.
    pub fn last_read_time(&self) -> Option<u32> {
        self.last_read_time
    }
}

/// Where a reading returned by [`Am2302::read_with_source`] came from.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadSource {
    /// Captured from the sensor during this call.
    Fresh,
    /// Served from the cache because the minimum interval had not elapsed.
    Cached,
}

/// Driver for the AM2302 (DHT22) temperature and humidity sensor.
///
/// Captures are rate limited: the sensor needs about two seconds between
/// measurements, and polling faster returns the last good reading instead.
/// A driver instance owns its line; reads take `&mut self`, so concurrent access
/// has to be serialized by the owner.
pub struct Am2302<LINE, CLOCK> {
    decoder: Decoder<LINE, CLOCK>,
    min_interval_ms: u32,
    state: SensorState,
}

impl<LINE, CLOCK> Am2302<LINE, CLOCK>
where
    LINE: DataLine,
    CLOCK: Clock,
{
    /// Creates a new instance of the AM2302 driver with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `line` - The GPIO connected to the sensor's data line. Must support both input and output.
    /// * `clock` - Microsecond and tick time sources. The microsecond counter also times
    ///   the 1 ms start signal, so no delay provider is needed.
    pub fn new(line: LINE, clock: CLOCK) -> Self {
        Self::with_config(line, clock, Config::default())
    }

    /// Creates a driver with the given configuration.
    ///
    /// `config.active_high_init` is moved into the [`SensorState`], which is the only
    /// place the driver reads it from afterwards.
    pub fn with_config(line: LINE, clock: CLOCK, config: Config) -> Self {
        let state = SensorState::new(line.pin_number(), config.active_high_init);
        Am2302 {
            decoder: Decoder::new(line, clock),
            min_interval_ms: config.min_interval_ms,
            state,
        }
    }

    /// Reads temperature and humidity, from the sensor or from the cache.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` with fresh values, or the cached ones if polled too soon
    /// * `Err(DhtError::TooSoon)` if polled too soon before any successful read
    /// * `Err(DhtError)` for any other capture or decode failure
    pub fn read(&mut self) -> Result<Reading, DhtError<LINE::Error>> {
        self.read_with_source().map(|(reading, _)| reading)
    }

    /// Like [`Am2302::read`], also telling whether the reading was captured now.
    pub fn read_with_source(&mut self) -> Result<(Reading, ReadSource), DhtError<LINE::Error>> {
        if !self.decoder.line().is_output_capable() {
            #[cfg(feature = "defmt")]
            defmt::error!("The pin {} is an input pin only", self.state.pin);
            return Err(DhtError::InputOnlyPin);
        }

        if self.too_soon() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Too short time interval between two reads");
            return match self.state.last {
                Some(raw) => Ok((raw.to_reading(), ReadSource::Cached)),
                None => Err(DhtError::TooSoon),
            };
        }

        let result = self.decoder.capture_and_decode(self.state.active_high_init);
        self.state.last_read_time = Some(self.decoder.clock().now_ticks());

        match result {
            Ok(raw) => {
                self.state.last = Some(raw);
                Ok((raw.to_reading(), ReadSource::Fresh))
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Read error: {=str}", err.kind());
                Err(err)
            }
        }
    }

    /// The most recent checksum-valid reading, if any.
    pub fn last_reading(&self) -> Option<Reading> {
        self.state.last.map(RawReading::to_reading)
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// The configuration in effect.
    pub fn config(&self) -> Config {
        Config {
            active_high_init: self.state.active_high_init,
            min_interval_ms: self.min_interval_ms,
        }
    }

    /// Gives back the owned line and clock.
    pub fn release(self) -> (LINE, CLOCK) {
        self.decoder.release()
    }

    /// Whether the previous capture attempt was less than the minimum interval ago.
    fn too_soon(&self) -> bool {
        let Some(last) = self.state.last_read_time else {
            return false;
        };
        let clock = self.decoder.clock();
        let elapsed = clock.now_ticks().wrapping_sub(last);
        elapsed < clock.ms_to_ticks(self.min_interval_ms)
    }
}

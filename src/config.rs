/// Minimum spacing between two captures, imposed by the sensor's recovery time.
pub const MIN_READ_INTERVAL_MS: u32 = 2000;

/// Driver configuration.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Set the output latch high when releasing the line after the start signal.
    /// Usually only needed without a MOSFET level shifter.
    pub active_high_init: bool,
    /// Captures closer together than this are answered from the cache.
    pub min_interval_ms: u32,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            active_high_init: false,
            min_interval_ms: MIN_READ_INTERVAL_MS,
        }
    }

    pub const fn with_active_high_init(mut self) -> Self {
        self.active_high_init = true;
        self
    }

    pub const fn with_min_interval_ms(mut self, min_interval_ms: u32) -> Self {
        self.min_interval_ms = min_interval_ms;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

//! Simulated data line and clock for exercising the driver without hardware.
//!
//! The line replays a [`Waveform`] relative to the moment the driver releases it
//! (switches it from output back to input). Every call to [`Clock::now_us`] advances the
//! virtual time by one microsecond, which stands in for the cost of a polling iteration.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::{
    frame::{FRAME_PULSES, PulseFrame},
    hal::{Clock, DataLine, Direction, Pull},
};

pub const LOW_US: u32 = 50;
pub const ZERO_HIGH_US: u32 = 26;
pub const ONE_HIGH_US: u32 = 70;
pub const INIT_US: u32 = 80;

/// Builds the pulse widths a healthy sensor would produce for the given words.
pub fn encode_frame(humidity: u16, temperature: u16, checksum: u8) -> PulseFrame {
    let word = (u64::from(humidity) << 24) | (u64::from(temperature) << 8) | u64::from(checksum);

    let mut widths = [0u32; FRAME_PULSES];
    widths[0] = INIT_US;
    widths[1] = INIT_US;
    for bit in 0..40 {
        let one = (word >> (39 - bit)) & 1 == 1;
        widths[2 + 2 * bit] = LOW_US;
        widths[3 + 2 * bit] = if one { ONE_HIGH_US } else { ZERO_HIGH_US };
    }
    PulseFrame::new(widths)
}

/// Line levels over time, as `(is_high, duration_us)` segments followed by a steady tail.
#[derive(Clone, Debug)]
pub struct Waveform {
    segments: Vec<(bool, i64)>,
    tail: bool,
}

impl Waveform {
    /// The given segments, then the idle (pulled-up) level.
    pub fn segments(segments: &[(bool, u32)]) -> Self {
        Waveform {
            segments: segments.iter().map(|&(level, us)| (level, i64::from(us))).collect(),
            tail: true,
        }
    }

    pub fn stuck(level: bool) -> Self {
        Waveform {
            segments: Vec::new(),
            tail: level,
        }
    }

    /// A sensor answering with `frame`: a short pull-up gap, the frame pulses, the
    /// trailing low the sensor emits after the last bit, then idle.
    pub fn from_frame(frame: &PulseFrame) -> Self {
        let mut segments = Vec::with_capacity(FRAME_PULSES + 2);
        segments.push((true, 20));
        for (index, &width) in frame.widths().iter().enumerate() {
            segments.push((index % 2 == 1, width));
        }
        segments.push((false, LOW_US));
        Self::segments(&segments)
    }

    /// Cuts the waveform after `pulses` frame pulses and holds the line at `level`.
    pub fn truncated(mut self, pulses: usize, level: bool) -> Self {
        self.segments.truncate(pulses + 1);
        self.tail = level;
        self
    }

    fn level_at(&self, elapsed: i64) -> bool {
        let mut end = 0;
        for &(level, duration) in &self.segments {
            end += duration;
            if elapsed < end {
                return level;
            }
        }
        self.tail
    }
}

struct Inner {
    now_us: Cell<i64>,
    ticks: Cell<u32>,
    waveform: RefCell<Waveform>,
    released_at: Cell<Option<i64>>,
    direction: Cell<Direction>,
    pull: Cell<Pull>,
    driven_high: Cell<bool>,
    latched_high: Cell<bool>,
    output_capable: Cell<bool>,
    captures: Cell<usize>,
}

/// Shared state behind a simulated line and clock.
#[derive(Clone)]
pub struct SimBus {
    inner: Rc<Inner>,
}

impl SimBus {
    pub fn new(waveform: Waveform) -> Self {
        SimBus {
            inner: Rc::new(Inner {
                now_us: Cell::new(1_000),
                ticks: Cell::new(0),
                waveform: RefCell::new(waveform),
                released_at: Cell::new(None),
                direction: Cell::new(Direction::Input),
                pull: Cell::new(Pull::None),
                driven_high: Cell::new(true),
                latched_high: Cell::new(false),
                output_capable: Cell::new(true),
                captures: Cell::new(0),
            }),
        }
    }

    pub fn line(&self) -> SimLine {
        SimLine {
            inner: self.inner.clone(),
        }
    }

    pub fn clock(&self) -> SimClock {
        SimClock {
            inner: self.inner.clone(),
        }
    }

    /// Replaces the waveform the sensor answers with on the next release.
    pub fn load(&self, waveform: Waveform) {
        *self.inner.waveform.borrow_mut() = waveform;
    }

    /// Starts replaying the waveform from the current time.
    pub fn release_now(&self) {
        self.inner.released_at.set(Some(self.inner.now_us.get()));
    }

    /// Current virtual time, without advancing it.
    pub fn now_us(&self) -> i64 {
        self.inner.now_us.get()
    }

    /// Virtual time at which the line was last handed to the sensor.
    pub fn released_at(&self) -> Option<i64> {
        self.inner.released_at.get()
    }

    pub fn set_ticks(&self, ticks: u32) {
        self.inner.ticks.set(ticks);
    }

    pub fn advance_ms(&self, ms: u32) {
        self.inner.ticks.set(self.inner.ticks.get().wrapping_add(ms));
    }

    pub fn make_input_only(&self) {
        self.inner.output_capable.set(false);
    }

    /// Number of times the line was released to the sensor.
    pub fn captures(&self) -> usize {
        self.inner.captures.get()
    }

    pub fn direction(&self) -> Direction {
        self.inner.direction.get()
    }

    pub fn pull(&self) -> Pull {
        self.inner.pull.get()
    }

    /// Whether the output latch was set high while the line was an input.
    pub fn latched_high(&self) -> bool {
        self.inner.latched_high.get()
    }
}

pub struct SimLine {
    inner: Rc<Inner>,
}

impl SimLine {
    fn level(&self) -> bool {
        let inner = &self.inner;
        match (inner.direction.get(), inner.released_at.get()) {
            (Direction::Output, _) => inner.driven_high.get(),
            (Direction::Input, Some(at)) => {
                inner.waveform.borrow().level_at(inner.now_us.get() - at)
            }
            (Direction::Input, None) => true,
        }
    }

    fn drive(&mut self, high: bool) {
        let inner = &self.inner;
        match inner.direction.get() {
            Direction::Output => inner.driven_high.set(high),
            Direction::Input => inner.latched_high.set(high),
        }
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl DataLine for SimLine {
    fn pin_number(&self) -> u8 {
        4
    }

    fn is_output_capable(&self) -> bool {
        self.inner.output_capable.get()
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let inner = &self.inner;
        if inner.direction.get() == Direction::Output && direction == Direction::Input {
            inner.released_at.set(Some(inner.now_us.get()));
            inner.captures.set(inner.captures.get() + 1);
        }
        inner.direction.set(direction);
        Ok(())
    }

    fn set_pull(&mut self, pull: Pull) -> Result<(), Self::Error> {
        self.inner.pull.set(pull);
        Ok(())
    }
}

pub struct SimClock {
    inner: Rc<Inner>,
}

impl Clock for SimClock {
    fn now_us(&self) -> i64 {
        let now = self.inner.now_us.get();
        self.inner.now_us.set(now + 1);
        now
    }

    fn now_ticks(&self) -> u32 {
        self.inner.ticks.get()
    }

    fn tick_rate_hz(&self) -> u32 {
        1000
    }
}

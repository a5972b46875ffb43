use embedded_hal::digital::PinState;

use crate::{
    error::DhtError,
    frame::{FRAME_PULSES, PulseFrame},
    hal::{Clock, DataLine, Direction, Pull},
    pulse::measure_pulse,
    reading::RawReading,
};

/// How long the line is held low to request a measurement, in microseconds.
const START_PULSE_US: u32 = 1000;

/// Upper bound for every pulse in a frame, in microseconds. No legal pulse is longer.
const PULSE_TIMEOUT_US: u32 = 120;

/// Drives the AM2302 start signal and decodes the frame the sensor answers with.
pub struct Decoder<LINE, CLOCK> {
    line: LINE,
    clock: CLOCK,
}

impl<LINE, CLOCK> Decoder<LINE, CLOCK>
where
    LINE: DataLine,
    CLOCK: Clock,
{
    pub fn new(line: LINE, clock: CLOCK) -> Self {
        Decoder { line, clock }
    }

    pub fn line(&self) -> &LINE {
        &self.line
    }

    pub fn clock(&self) -> &CLOCK {
        &self.clock
    }

    /// Gives back the owned line and clock.
    pub fn release(self) -> (LINE, CLOCK) {
        (self.line, self.clock)
    }

    /// Requests a measurement and decodes the response.
    ///
    /// The start signal, pulse capture and decoding run inside a critical section so
    /// that no interrupt or task switch distorts the pulse timing. The line is left as
    /// an input with pull-up, whatever the outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(RawReading)` for a complete frame with a valid handshake and checksum
    /// * `Err(DhtError)` naming the first problem; nothing is retried
    pub fn capture_and_decode(
        &mut self,
        active_high_init: bool,
    ) -> Result<RawReading, DhtError<LINE::Error>> {
        if !self.line.is_output_capable() {
            return Err(DhtError::InputOnlyPin);
        }

        let captured = critical_section::with(|_cs| -> Result<_, DhtError<LINE::Error>> {
            self.send_start(active_high_init)?;
            let frame = self.capture_frame()?;
            let decoded = frame.decode();
            Ok((frame, decoded))
        });

        let (frame, decoded) = captured.inspect_err(|_| self.restore_idle())?;

        #[cfg(feature = "defmt")]
        {
            let widths = frame.widths();
            defmt::trace!("Init --- Low: {}, High: {}", widths[0], widths[1]);
            for (bit, pair) in widths[2..].chunks_exact(2).enumerate() {
                defmt::trace!("Data {} --- Low: {}, High: {}", bit, pair[0], pair[1]);
            }
            if let Err(err) = &decoded {
                defmt::debug!("Frame rejected: {=str}", err.kind());
            }
        }
        #[cfg(not(feature = "defmt"))]
        let _ = frame;

        decoded
    }

    /// Sends the start signal and hands the line over to the sensor.
    ///
    /// The line is driven low for 1 ms (busy-polling the clock, since this runs with
    /// interrupts disabled), then switched to an input with pull-up. With
    /// `active_high_init` the output latch is also set high, which wiring without a
    /// level shifter needs to pull the line up quickly enough.
    fn send_start(&mut self, active_high_init: bool) -> Result<(), DhtError<LINE::Error>> {
        self.line.set_direction(Direction::Output)?;
        self.line.set_low()?;
        self.hold_for(START_PULSE_US);

        self.line.set_direction(Direction::Input)?;
        self.line.set_pull(Pull::Up)?;
        if active_high_init {
            self.line.set_high()?;
        }
        Ok(())
    }

    /// Spins on the microsecond clock for `duration_us`.
    fn hold_for(&self, duration_us: u32) {
        let start = self.clock.now_us();
        while self.clock.now_us() - start < i64::from(duration_us) {}
    }

    /// Captures all frame pulses, alternating low and high, starting with the init low.
    fn capture_frame(&mut self) -> Result<PulseFrame, DhtError<LINE::Error>> {
        let mut widths = [0u32; FRAME_PULSES];

        for (index, width) in widths.iter_mut().enumerate() {
            let level = if index % 2 == 0 {
                PinState::Low
            } else {
                PinState::High
            };
            *width = measure_pulse(&mut self.line, &self.clock, level, PULSE_TIMEOUT_US)?;
        }

        Ok(PulseFrame::new(widths))
    }

    /// Puts the line back into its idle configuration.
    ///
    /// Errors are ignored so the caller sees the error that aborted the capture.
    fn restore_idle(&mut self) {
        let _ = self.line.set_direction(Direction::Input);
        let _ = self.line.set_pull(Pull::Up);
    }
}

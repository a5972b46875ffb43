use embedded_hal::digital::{InputPin, PinState};

use crate::{error::DhtError, hal::Clock};

/// Measures one pulse at `level` on the data line.
///
/// Busy-polls until the line reaches `level`, then until it leaves it again. Each phase
/// is bounded by `timeout_us` on its own.
///
/// # Returns
///
/// * `Ok(width)` with the time in microseconds the line stayed at `level`
/// * `Err(DhtError::Timeout)` if either phase exceeds `timeout_us`
pub fn measure_pulse<LINE, CLOCK>(
    line: &mut LINE,
    clock: &CLOCK,
    level: PinState,
    timeout_us: u32,
) -> Result<u32, DhtError<LINE::Error>>
where
    LINE: InputPin,
    CLOCK: Clock,
{
    let timeout = i64::from(timeout_us);

    let start = clock.now_us();
    while PinState::from(line.is_high()?) != level {
        if clock.now_us() - start > timeout {
            return Err(DhtError::Timeout);
        }
    }

    let start = clock.now_us();
    while PinState::from(line.is_high()?) == level {
        if clock.now_us() - start > timeout {
            return Err(DhtError::Timeout);
        }
    }

    Ok((clock.now_us() - start) as u32)
}

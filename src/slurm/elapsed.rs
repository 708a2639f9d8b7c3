use std::time::Duration;

use super::error::ParseError;

/// Parses the `Elapsed` column of `sacct` (`[days-]HH:MM:SS`).
///
/// A time component that is not made of exactly three `:`-separated values
/// is treated as zero rather than as an error; only non-numeric values in a
/// recognized position are rejected.
pub fn parse_elapsed(value: &str) -> Result<Duration, ParseError> {
    let parse = |slot: &str| {
        slot.parse::<u64>()
            .map_err(|_| ParseError::new("elapsed", value))
    };

    let mut days = 0;
    let mut time = value;

    let parts = value.split('-').collect::<Vec<_>>();
    if let [d, rest] = parts[..] {
        days = parse(d)?;
        time = rest;
    }

    let (mut hours, mut minutes, mut seconds) = (0, 0, 0);
    let parts = time.split(':').collect::<Vec<_>>();
    if let [h, m, s] = parts[..] {
        hours = parse(h)?;
        minutes = parse(m)?;
        seconds = parse(s)?;
    }

    let hours = days.saturating_mul(24).saturating_add(hours);
    let secs = hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds);

    Ok(Duration::from_secs(secs))
}

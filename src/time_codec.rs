/*!
 * Conversion between `HH:MM:SS.mmm` caption timestamps and seconds.
 *
 * Formatting rounds to the nearest millisecond before splitting the value
 * into components, so a fractional second that rounds up to 60.000 carries
 * into the minutes (and from there into the hours) instead of rendering as
 * `00:00:60.000` or silently dropping the millisecond.
 */

use log::{debug, warn};

use crate::errors::CaptionError;

/// Regex fragment matching one timestamp; hours widen past two digits
pub const TIMESTAMP_PATTERN: &str = r"\d{2,}:\d{2}:\d{2}\.\d{3}";

const ZERO_TIMESTAMP: &str = "00:00:00.000";

/// Decode a timestamp into seconds, returning `f64::NAN` when it cannot be decoded.
///
/// This is the sentinel form used by the parser: a bad value is carried
/// forward as an unusable number instead of aborting the parse.
pub fn parse_timestamp(timestamp: &str) -> f64 {
    match try_parse_timestamp(timestamp) {
        Ok(seconds) => seconds,
        Err(e) => {
            debug!("{}", e);
            f64::NAN
        }
    }
}

/// Decode a timestamp into seconds.
///
/// The text is split on `:` into exactly three components: integer hours,
/// integer minutes and real seconds. Component ranges are not checked, so
/// `00:75:00.000` decodes to 4500 seconds. Every component is plain ASCII
/// digits (seconds may carry one decimal point); signs, exponents and
/// `inf`/`NaN` are rejected.
pub fn try_parse_timestamp(timestamp: &str) -> Result<f64, CaptionError> {
    let malformed = || CaptionError::MalformedTimestamp(timestamp.to_string());

    let parts: Vec<&str> = timestamp.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(malformed());
    }

    // Integer and float parsing both accept signs; f64 also takes exponents and "inf"
    if !is_digits(parts[0]) || !is_digits(parts[1]) || !is_decimal(parts[2]) {
        return Err(malformed());
    }

    let hours: u32 = parts[0].parse().map_err(|_| malformed())?;
    let minutes: u32 = parts[1].parse().map_err(|_| malformed())?;
    let seconds: f64 = parts[2].parse().map_err(|_| malformed())?;

    Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && (fraction.is_empty() || is_digits(fraction)),
        None => is_digits(text),
    }
}

/// Render seconds as `HH:MM:SS.mmm`.
///
/// Hours are at least two digits wide and grow as needed. Negative input
/// clamps to zero; NaN and infinities render as zero and are logged.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() {
        warn!("Cannot format non-finite timestamp {}, using {}", seconds, ZERO_TIMESTAMP);
        return ZERO_TIMESTAMP.to_string();
    }

    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    format_millis(total_ms)
}

/// Render a whole number of milliseconds as `HH:MM:SS.mmm`
pub fn format_millis(total_ms: u64) -> String {
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

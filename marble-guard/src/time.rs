//! Conversion between `HH:MM:SS.s` clock strings and total seconds.

use crate::error::{MarbleError, Result};

/// Parses a `HH:MM:SS.s` clock string into total seconds.
///
/// Hours and minutes must be integers (zero padding optional); seconds may
/// carry a fractional part. Whitespace around each part is ignored.
///
/// # Examples
///
/// ```rust
/// use marble_guard::time::parse_time;
///
/// assert_eq!(parse_time("01:02:03.5").unwrap(), 3723.5);
/// assert_eq!(parse_time("25:00:00").unwrap(), 90000.0);
/// assert!(parse_time("02:03.5").is_err());
/// ```
pub fn parse_time(text: &str) -> Result<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(MarbleError::Parse(format!(
            "unable to parse time string '{text}': expected 3 ':'-separated parts, found {}",
            parts.len()
        )));
    }

    let hours: i64 = parts[0].trim().parse().map_err(|_| {
        MarbleError::Parse(format!(
            "unable to parse time string '{text}': hours '{}' is not an integer",
            parts[0]
        ))
    })?;
    let minutes: i64 = parts[1].trim().parse().map_err(|_| {
        MarbleError::Parse(format!(
            "unable to parse time string '{text}': minutes '{}' is not an integer",
            parts[1]
        ))
    })?;
    let seconds: f64 = parts[2].trim().parse().map_err(|_| {
        MarbleError::Parse(format!(
            "unable to parse time string '{text}': seconds '{}' is not a number",
            parts[2]
        ))
    })?;

    if !seconds.is_finite() {
        return Err(MarbleError::Parse(format!(
            "unable to parse time string '{text}': seconds must be finite"
        )));
    }

    Ok(3600.0 * hours as f64 + 60.0 * minutes as f64 + seconds)
}

/// Formats total seconds as a `HH:MM:SS.s` clock string for display.
///
/// Hours are not wrapped at 24.
///
/// ```rust
/// use marble_guard::time::format_time;
///
/// assert_eq!(format_time(3723.5), "01:02:03.5");
/// assert_eq!(format_time(90000.0), "25:00:00.0");
/// ```
pub fn format_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = ((seconds / 60.0).floor() as i64).rem_euclid(60);
    let secs = seconds.rem_euclid(60.0);

    format!("{hours:02}:{minutes:02}:{secs:04.1}")
}

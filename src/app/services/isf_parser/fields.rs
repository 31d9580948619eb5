//! Fixed-column field decoding for ISF block lines
//!
//! Column ranges are 0-indexed and end-exclusive, matching the legacy ISF
//! layout. A blank range is an absent value for optional fields and a decode
//! failure for required ones. Ranges falling beyond the end of the line are
//! clamped, so an optional field missing entirely reads as absent.

use crate::{Error, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::ops::Range;

/// Slice a column range out of a line, clamping to the line's length.
/// Returns `None` when the range starts past the end of the line.
fn slice(line: &str, range: Range<usize>) -> Option<&str> {
    if range.start >= line.len() {
        return None;
    }
    let end = range.end.min(line.len());
    line.get(range.start..end)
}

/// A trimmed, non-empty column value, or `None` if blank or out of range
pub fn optional_str(line: &str, range: Range<usize>) -> Option<&str> {
    slice(line, range).map(str::trim).filter(|s| !s.is_empty())
}

/// A trimmed column value that must be present
pub fn required_str<'a>(line: &'a str, range: Range<usize>, what: &str) -> Result<&'a str> {
    optional_str(line, range.clone())
        .ok_or_else(|| Error::field_decoding(format!("missing {what} (columns {range:?})")))
}

/// Decode an optional floating-point column
pub fn optional_f64(line: &str, range: Range<usize>, what: &str) -> Result<Option<f64>> {
    match optional_str(line, range) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| Error::field_decoding(format!("invalid number for {what}: '{raw}'"))),
    }
}

/// Decode a required floating-point column
pub fn required_f64(line: &str, range: Range<usize>, what: &str) -> Result<f64> {
    optional_f64(line, range.clone(), what)?
        .ok_or_else(|| Error::field_decoding(format!("missing {what} (columns {range:?})")))
}

/// Decode an optional integer column
pub fn optional_i32(line: &str, range: Range<usize>, what: &str) -> Result<Option<i32>> {
    match optional_str(line, range) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| Error::field_decoding(format!("invalid integer for {what}: '{raw}'"))),
    }
}

/// True when the byte at `index` is the ISF "fixed" marker `f`
pub fn fixed_flag_at(line: &str, index: usize) -> bool {
    line.as_bytes().get(index) == Some(&b'f')
}

/// The single-character code at `index`, or `None` when blank or absent
pub fn code_at(line: &str, index: usize) -> Option<char> {
    line.as_bytes()
        .get(index)
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .map(char::from)
}

/// Decode the origin timestamp from the head of an origin block line:
/// date in columns 0..10 (`YYYY/MM/DD`), time in 11..19 (`hh:mm:ss`), and
/// optional centiseconds in 20..22. Some agencies omit the subsecond part,
/// in which case the time is whole seconds.
pub fn origin_time(line: &str) -> Result<NaiveDateTime> {
    let date_str = required_str(line, 0..10, "origin date")?;
    let date = NaiveDate::parse_from_str(date_str, "%Y/%m/%d")
        .map_err(|_| Error::field_decoding(format!("invalid origin date: '{date_str}'")))?;

    let time_str = required_str(line, 11..19, "origin time")?;
    let time = NaiveTime::parse_from_str(time_str, "%H:%M:%S")
        .map_err(|_| Error::field_decoding(format!("invalid origin time: '{time_str}'")))?;

    let mut timestamp = NaiveDateTime::new(date, time);
    if let Some(centiseconds) = optional_i32(line, 20..22, "origin time centiseconds")? {
        timestamp += Duration::milliseconds(i64::from(centiseconds) * 10);
    }
    Ok(timestamp)
}

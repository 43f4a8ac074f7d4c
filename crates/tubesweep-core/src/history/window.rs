use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use crate::{Error, Result};

static WINDOW_RE: OnceLock<Regex> = OnceLock::new();

/// Parse a scan-window string like "1h", "3h", "12h" or "1d".
///
/// Only hours and days are accepted; anything else is a usage error.
pub fn parse_window(input: &str) -> Result<Duration> {
    let re = WINDOW_RE.get_or_init(|| Regex::new(r"^(\d+)([hd])$").expect("window pattern"));

    let trimmed = input.trim();
    let captures = re.captures(trimmed).ok_or_else(|| invalid(input))?;

    let value: i64 = captures[1].parse().map_err(|_| invalid(input))?;

    match &captures[2] {
        "h" => Ok(Duration::hours(value)),
        _ => Ok(Duration::days(value)),
    }
}

fn invalid(input: &str) -> Error {
    Error::InvalidWindow(format!(
        "{:?} is not a valid duration. \
         Accepted format: a number followed by 'h' (hours) or 'd' (days), \
         e.g. 1h, 3h, 12h, 1d",
        input
    ))
}

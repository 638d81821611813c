//! Validation of user-supplied settings.

use anyhow::{Result, bail};

/// Year of the earliest surviving motion picture.
const EARLIEST_YEAR: u32 = 1888;

/// Years past the current one accepted for announced releases.
const FUTURE_YEARS: u32 = 5;

/// Number of leading key characters shown by [`mask_api_key`].
const VISIBLE_KEY_CHARS: usize = 2;

/// Keys up to this length are masked completely.
const FULLY_MASKED_LEN: usize = 4;

/// Returns the trimmed API key.
///
/// # Errors
///
/// Returns an error if the key is blank or contains whitespace.
pub fn validate_api_key(key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    if key.chars().any(char::is_whitespace) {
        bail!("API key must not contain whitespace");
    }
    Ok(key.to_owned())
}

/// Returns the trimmed search term.
///
/// # Errors
///
/// Returns an error if the term is blank.
pub fn validate_term(term: &str) -> Result<String> {
    let term = term.trim();
    if term.is_empty() {
        bail!("search term must not be empty");
    }
    Ok(term.to_owned())
}

/// Checks that `year` lies in `1888..=current_year + 5`.
///
/// # Errors
///
/// Returns an error if the year is out of range.
pub fn validate_year(year: u32, current_year: u32) -> Result<u32> {
    let latest = current_year.saturating_add(FUTURE_YEARS);
    if !(EARLIEST_YEAR..=latest).contains(&year) {
        bail!("year must be between {EARLIEST_YEAR} and {latest}, got {year}");
    }
    Ok(year)
}

/// Masks all but the first characters of an API key.
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= FULLY_MASKED_LEN {
        return "*".repeat(len);
    }
    let visible: String = key.chars().take(VISIBLE_KEY_CHARS).collect();
    format!("{visible}{}", "*".repeat(len.saturating_sub(VISIBLE_KEY_CHARS)))
}

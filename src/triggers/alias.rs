// Numeric alias resolver - maps a trailing `__N` in the buffer to the Nth configuration

use regex::Regex;
use std::sync::OnceLock;

/// Trailing `__<digits>` found at the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasSuffix {
    /// Parsed number, or None when the digits overflow
    pub number: Option<usize>,
    /// Characters in the full `__N` text, i.e. how many backspaces erase it
    pub char_len: usize,
}

fn alias_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(r"__([0-9]+)$") {
            Ok(regex) => Some(regex),
            Err(e) => {
                crate::error!("Failed to compile alias pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Find the maximal `__<digits>` run anchored at the end of `buffer`.
pub fn trailing_alias(buffer: &str) -> Option<AliasSuffix> {
    let captures = alias_pattern()?.captures(buffer)?;
    let whole = captures.get(0)?;
    let digits = captures.get(1)?.as_str();

    Some(AliasSuffix {
        number: digits.parse::<usize>().ok(),
        // digits are ASCII so byte length equals character count
        char_len: whole.as_str().len(),
    })
}

/// Return the name at 1-based position `number`, if in `[1, names.len()]`.
pub fn resolve_alias(names: &[String], number: usize) -> Option<&str> {
    number
        .checked_sub(1)
        .and_then(|index| names.get(index))
        .map(String::as_str)
}

#[cfg(test)]
#[path = "alias_test.rs"]
mod tests;

//! Size string parsing and unit conversion
//!
//! Sizes are expressed as `<integer><unit>` and normalized to whole MiB,
//! the base allocation unit everything downstream computes in.

use crate::utils::error::{Result, VolplanError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Bytes in one MiB, the base allocation unit.
pub const MIB_BYTES: u64 = 1024 * 1024;

/// Bytes in one GiB.
pub const GIB_BYTES: u64 = 1024 * MIB_BYTES;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)(%|MiB|GiB)$").unwrap());

/// A unit accepted by [`parse_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Reserved syntax: parses, but has no absolute byte value without a
    /// reference quantity.
    Percent,
    Mib,
    Gib,
}

impl Unit {
    fn from_suffix(suffix: &str) -> Option<Unit> {
        match suffix {
            "%" => Some(Unit::Percent),
            "MiB" => Some(Unit::Mib),
            "GiB" => Some(Unit::Gib),
            _ => None,
        }
    }

    /// Bytes per unit. `None` for units with no absolute byte value.
    fn bytes(self) -> Option<u64> {
        match self {
            Unit::Percent => None,
            Unit::Mib => Some(MIB_BYTES),
            Unit::Gib => Some(GIB_BYTES),
        }
    }
}

/// Parse a size string into whole MiB.
///
/// The unit converts through the fixed bytes-per-unit table, then the byte
/// count is floor-divided into MiB. Remainders are truncated, never rounded.
/// Passing the reserved `%` unit fails with `UnsupportedUnit` since there is
/// no base quantity to resolve a percentage against.
pub fn parse_size(input: &str) -> Result<u64> {
    let caps = SIZE_PATTERN
        .captures(input)
        .ok_or_else(|| VolplanError::InvalidFormat(input.to_string()))?;

    let count: u64 = caps[1]
        .parse()
        .map_err(|_| VolplanError::InvalidFormat(input.to_string()))?;

    let unit = match Unit::from_suffix(&caps[2]) {
        Some(unit) => unit,
        None => return Err(VolplanError::InvalidFormat(input.to_string())),
    };

    let unit_bytes = unit.bytes().ok_or_else(|| VolplanError::UnsupportedUnit {
        input: input.to_string(),
        unit: caps[2].to_string(),
    })?;

    let total_bytes = count
        .checked_mul(unit_bytes)
        .ok_or_else(|| VolplanError::InvalidFormat(input.to_string()))?;

    Ok(total_bytes / MIB_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mib() {
        assert_eq!(parse_size("200MiB").unwrap(), 200);
        assert_eq!(parse_size("0MiB").unwrap(), 0);
    }

    #[test]
    fn parses_gib_as_mib() {
        assert_eq!(parse_size("1GiB").unwrap(), 1024);
        assert_eq!(parse_size("10GiB").unwrap(), 10240);
    }

    #[test]
    fn percent_is_unsupported_for_absolute_sizes() {
        match parse_size("50%") {
            Err(VolplanError::UnsupportedUnit { unit, .. }) => assert_eq!(unit, "%"),
            other => panic!("expected UnsupportedUnit, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "10", "MiB", "10MB", "10 MiB", "-5MiB", "1.5GiB", "10KiB"] {
            assert!(
                matches!(parse_size(input), Err(VolplanError::InvalidFormat(_))),
                "input '{}' should be rejected",
                input
            );
        }
    }

    #[test]
    fn rejects_overflowing_count() {
        assert!(matches!(
            parse_size("99999999999999999999MiB"),
            Err(VolplanError::InvalidFormat(_))
        ));
        // Parses as u64 but overflows the byte multiplication
        assert!(matches!(
            parse_size("18446744073709551615GiB"),
            Err(VolplanError::InvalidFormat(_))
        ));
    }
}

//! Human-readable size strings to exact byte counts.

use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};

// Fractional digits beyond this are below a byte for every supported unit.
const MAX_FRACTION_DIGITS: usize = 18;

fn multiplier(unit: &str) -> Option<u128> {
    Some(match unit.to_ascii_lowercase().as_str() {
        "b" | "byte" | "bytes" => 1,
        "kib" => 1 << 10,
        "mib" => 1 << 20,
        "gib" => 1 << 30,
        "tib" => 1 << 40,
        "pib" => 1 << 50,
        "kb" => 1_000,
        "mb" => 1_000_000,
        "gb" => 1_000_000_000,
        "tb" => 1_000_000_000_000,
        "pb" => 1_000_000_000_000_000,
        _ => return None,
    })
}

/// Converts a size such as `1.5 GiB` into bytes.
///
/// The decimal digits are scaled with integer arithmetic, so the result is
/// exact up to rounding (half-up) to the nearest byte. Binary units (`KiB`,
/// `MiB`, ...) are powers of 1024, decimal units (`KB`, `MB`, ...) powers of
/// 1000. Thousands separators in the integer part are accepted.
///
/// ```rust
/// use sznjd_extract::parse_size;
/// assert_eq!(parse_size("1.5 GiB").unwrap(), 1_610_612_736);
/// assert_eq!(parse_size("700 MiB").unwrap(), 734_003_200);
/// ```
pub fn parse_size(size: &str) -> Result<u64> {
    let invalid = || ErrorKind::ParseError {
        field: "size",
        value: size.to_string(),
    };
    let captures = consts::SIZE_REGEX.captures(size).ok_or_raise(invalid)?;
    let multiplier = multiplier(&captures[3]).ok_or_raise(invalid)?;
    let whole = captures[1].replace(',', "").parse::<u128>().or_raise(invalid)?;
    let mut bytes = whole.checked_mul(multiplier).ok_or_raise(invalid)?;
    if let Some(fraction) = captures.get(2) {
        let digits = &fraction.as_str()[..fraction.len().min(MAX_FRACTION_DIGITS)];
        let scale = 10u128.pow(digits.len() as u32);
        let numerator = digits.parse::<u128>().or_raise(invalid)?;
        bytes = bytes.checked_add((numerator * multiplier + scale / 2) / scale).ok_or_raise(invalid)?;
    }
    u64::try_from(bytes).or_raise(invalid)
}

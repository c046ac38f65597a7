//! Base-unit to decimal conversion.
//!
//! On-chain amounts are fixed-point `uint256` integers. Conversion to a
//! decimal string uses `U256` division and remainder only, so no precision is
//! lost.

use super::errors::ValidationError;
use alloy_primitives::U256;

/// Decimals of the native coin.
pub const NATIVE_DECIMALS: u32 = 18;

/// Parse a base-unit amount given as decimal digits or `0x`-prefixed hex.
pub fn parse_base_units(raw: &str) -> Result<U256, ValidationError> {
    let trimmed = raw.trim();
    let parsed = if let Some(hex_digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if hex_digits.is_empty() {
            Ok(U256::ZERO)
        } else {
            U256::from_str_radix(hex_digits, 16)
        }
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) && !trimmed.is_empty() {
        U256::from_str_radix(trimmed, 10)
    } else {
        return Err(ValidationError::InvalidAmount(trimmed.to_string()));
    };

    parsed.map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))
}

/// Render `value` base units with `decimals` fractional digits.
///
/// Trailing fractional zeros are dropped, so `1_500_000_000_000_000_000` at
/// 18 decimals renders as `"1.5"` and whole amounts carry no decimal point.
pub fn format_units(value: U256, decimals: u32) -> String {
    let (whole, fraction) = match U256::from(10u64).checked_pow(U256::from(decimals)) {
        Some(divisor) => (value / divisor, value % divisor),
        // 10^decimals exceeds any uint256, so the whole part is zero.
        None => (U256::ZERO, value),
    };

    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Native amount in the `formatEther` style of ethereum client libraries:
/// always at least one fractional digit, so 2 ether is `"2.0"`.
pub fn format_ether(value: U256) -> String {
    let formatted = format_units(value, NATIVE_DECIMALS);
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// Render a base-unit amount string with `decimals` fractional digits.
pub fn format_units_str(raw: &str, decimals: u32) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Ok("0".to_string());
    }
    parse_base_units(raw).map(|value| format_units(value, decimals))
}

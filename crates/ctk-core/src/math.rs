//! Exact uint256 helpers. Every division floors; nothing touches floats.

use crate::error::{Error, Result};
use alloy_primitives::{U256, U512};

/// `floor(amount * numerator / denominator)` with a 512-bit intermediate, so
/// the product can never overflow. Returns zero for a zero denominator.
pub fn mul_div_floor(amount: U256, numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() || amount.is_zero() || numerator.is_zero() {
        return U256::ZERO;
    }
    let wide = U512::from(amount) * U512::from(numerator) / U512::from(denominator);
    U256::saturating_from(wide)
}

/// `floor(amount * parts / whole)` for small integer ratios (bps, percent).
pub fn mul_ratio(amount: U256, parts: u64, whole: u64) -> U256 {
    mul_div_floor(amount, U256::from(parts), U256::from(whole))
}

/// Parse a uint256 from a decimal or `0x`-prefixed hex string.
pub fn parse_amount(raw: &str) -> Result<U256> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(Error::invalid("empty amount"));
    }
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            U256::from_str_radix(hex, 16)
        }
        Some(_) => return Err(Error::invalid(format!("malformed hex amount: {}", raw))),
        None if s.chars().all(|c| c.is_ascii_digit()) => U256::from_str_radix(s, 10),
        None => return Err(Error::invalid(format!("non-numeric amount: {}", raw))),
    };
    parsed.map_err(|e| Error::invalid(format!("amount out of range ({}): {}", e, raw)))
}

/// Current unix time in seconds.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SLIPPAGE GUARD & DEADLINES
//
// minOut = floor(amountOut * (10_000 - bps) / 10_000), exact uint256 math.
// A zero floor means "no protection", never an error.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::{Error, Result};
use crate::math::{mul_ratio, now_secs};
use crate::{BPS_DENOMINATOR, DEFAULT_DEADLINE_SECS};
use alloy_primitives::U256;

/// Reject tolerances above 100%.
pub fn check_slippage_bps(slippage_bps: u32) -> Result<()> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(Error::invalid(format!(
            "slippage must be within [0, {}] bps, got {}",
            BPS_DENOMINATOR, slippage_bps
        )));
    }
    Ok(())
}

/// Minimum acceptable output for a quoted gross output.
pub fn apply_slippage(amount_out: U256, slippage_bps: u32) -> Result<U256> {
    check_slippage_bps(slippage_bps)?;
    if amount_out.is_zero() {
        return Ok(U256::ZERO);
    }
    Ok(mul_ratio(
        amount_out,
        (BPS_DENOMINATOR - slippage_bps) as u64,
        BPS_DENOMINATOR as u64,
    ))
}

/// Resolve a minimum output from the locally available inputs.
///
/// Precedence: explicit `min_out`, then `expected_out` with slippage applied.
/// `None` means the caller has to fall back to a fresh quote.
pub fn resolve_min_out(
    min_out: Option<U256>,
    expected_out: Option<U256>,
    slippage_bps: u32,
) -> Result<Option<U256>> {
    check_slippage_bps(slippage_bps)?;
    if let Some(explicit) = min_out {
        return Ok(Some(explicit));
    }
    expected_out
        .map(|expected| apply_slippage(expected, slippage_bps))
        .transpose()
}

/// Unix timestamp `seconds_ahead` from now.
pub fn calc_deadline(seconds_ahead: u64) -> u64 {
    now_secs().saturating_add(seconds_ahead)
}

/// Deadline with the default 600 second window.
pub fn default_deadline() -> u64 {
    calc_deadline(DEFAULT_DEADLINE_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_percent_cut() {
        assert_eq!(
            apply_slippage(U256::from(1_000_000u64), 500).unwrap(),
            U256::from(950_000u64)
        );
    }

    #[test]
    fn test_default_eight_percent() {
        assert_eq!(
            apply_slippage(U256::from(1_000_000u64), crate::DEFAULT_SLIPPAGE_BPS).unwrap(),
            U256::from(920_000u64)
        );
    }

    #[test]
    fn test_zero_amount_short_circuits() {
        assert_eq!(apply_slippage(U256::ZERO, 0).unwrap(), U256::ZERO);
        assert_eq!(apply_slippage(U256::ZERO, 10_000).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_zero_bps_is_identity() {
        let x = U256::from(123_456_789u64);
        assert_eq!(apply_slippage(x, 0).unwrap(), x);
        assert_eq!(apply_slippage(U256::MAX, 0).unwrap(), U256::MAX);
    }

    #[test]
    fn test_full_tolerance_yields_zero_floor() {
        assert_eq!(apply_slippage(U256::from(1_000u64), 10_000).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_floor_not_round() {
        // 999 * 0.95 = 949.05
        assert_eq!(apply_slippage(U256::from(999u64), 500).unwrap(), U256::from(949u64));
    }

    #[test]
    fn test_out_of_range_bps_rejected() {
        let err = apply_slippage(U256::from(1_000u64), 10_001).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(resolve_min_out(Some(U256::from(1u64)), None, 20_000).is_err());
    }

    #[test]
    fn test_resolve_min_out_precedence() {
        let explicit = U256::from(777u64);
        let expected = U256::from(1_000u64);
        assert_eq!(
            resolve_min_out(Some(explicit), Some(expected), 500).unwrap(),
            Some(explicit)
        );
        assert_eq!(
            resolve_min_out(None, Some(expected), 500).unwrap(),
            Some(U256::from(950u64))
        );
        assert_eq!(resolve_min_out(None, None, 500).unwrap(), None);
    }

    #[test]
    fn test_explicit_zero_min_out_is_kept() {
        assert_eq!(
            resolve_min_out(Some(U256::ZERO), Some(U256::from(1_000u64)), 500).unwrap(),
            Some(U256::ZERO)
        );
    }

    #[test]
    fn test_calc_deadline_window() {
        let before = now_secs();
        let deadline = calc_deadline(600);
        let after = now_secs();
        assert!(deadline >= before + 600 && deadline <= after + 600);
        assert!(default_deadline() >= before + DEFAULT_DEADLINE_SECS);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLAIM PLANNER
//
// Turns a remote-reported pending balance and a requested percentage into a
// single claim: amount = floor(pending * pct / 100), plus a settlement shape
// chosen in strict priority order Path > Token > Native.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::Result;
use crate::math::mul_ratio;
use crate::slippage::calc_deadline;
use crate::types::{ClaimPlan, Percentage, Settlement};
use crate::validation::check_path;
use crate::DEFAULT_DEADLINE_SECS;
use alloy_primitives::{Address, U256};

pub const SKIP_NO_PENDING: &str = "No pending";
pub const SKIP_ROUNDS_TO_ZERO: &str = "Claim amount rounds to zero";

/// Caller's requested payout form. Both fields may be set; `path` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementRequest {
    pub token_out: Option<Address>,
    pub path: Option<Vec<Address>>,
}

impl SettlementRequest {
    pub fn native() -> Self {
        Self::default()
    }

    pub fn token(token_out: Address) -> Self {
        Self {
            token_out: Some(token_out),
            path: None,
        }
    }

    pub fn path(path: Vec<Address>) -> Self {
        Self {
            token_out: None,
            path: Some(path),
        }
    }

    /// Path > Token > Native. A zero `token_out` is the native sentinel.
    pub fn select(&self) -> Result<Settlement> {
        if let Some(path) = &self.path {
            check_path(path)?;
            return Ok(Settlement::Path(path.clone()));
        }
        match self.token_out {
            Some(token) if !token.is_zero() => Ok(Settlement::Token(token)),
            _ => Ok(Settlement::Native),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    Claim(ClaimPlan),
    Skip { reason: &'static str },
}

/// Plan a partial claim. `deadline_secs` defaults to 600.
///
/// Native settlement always carries a zero `min_out`; the native payout has
/// no swap leg to protect.
pub fn plan_claim(
    pending: U256,
    percentage: Percentage,
    request: &SettlementRequest,
    min_out: U256,
    deadline_secs: Option<u64>,
) -> Result<ClaimDecision> {
    let settlement = request.select()?;

    if pending.is_zero() {
        return Ok(ClaimDecision::Skip {
            reason: SKIP_NO_PENDING,
        });
    }

    let amount = mul_ratio(pending, percentage.get() as u64, 100);
    // The referral contract reads a zero amount as "claim everything".
    if amount.is_zero() {
        return Ok(ClaimDecision::Skip {
            reason: SKIP_ROUNDS_TO_ZERO,
        });
    }

    let min_out = match settlement {
        Settlement::Native => U256::ZERO,
        _ => min_out,
    };

    Ok(ClaimDecision::Claim(ClaimPlan {
        amount,
        settlement,
        min_out,
        deadline: calc_deadline(deadline_secs.unwrap_or(DEFAULT_DEADLINE_SECS)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::now_secs;

    fn pct(v: u32) -> Percentage {
        Percentage::new(v).unwrap()
    }

    fn plan(decision: ClaimDecision) -> ClaimPlan {
        match decision {
            ClaimDecision::Claim(plan) => plan,
            ClaimDecision::Skip { reason } => panic!("unexpected skip: {}", reason),
        }
    }

    #[test]
    fn test_zero_pending_skips() {
        let d = plan_claim(U256::ZERO, pct(100), &SettlementRequest::native(), U256::ZERO, None)
            .unwrap();
        assert_eq!(d, ClaimDecision::Skip { reason: SKIP_NO_PENDING });
    }

    #[test]
    fn test_half_claim() {
        let p = plan(
            plan_claim(U256::from(1000u64), pct(50), &SettlementRequest::native(), U256::ZERO, None)
                .unwrap(),
        );
        assert_eq!(p.amount, U256::from(500u64));
        assert_eq!(p.settlement, Settlement::Native);
    }

    #[test]
    fn test_floor_not_round() {
        let p = plan(
            plan_claim(U256::from(1000u64), pct(33), &SettlementRequest::native(), U256::ZERO, None)
                .unwrap(),
        );
        assert_eq!(p.amount, U256::from(330u64));

        let p = plan(
            plan_claim(U256::from(999u64), pct(67), &SettlementRequest::native(), U256::ZERO, None)
                .unwrap(),
        );
        // 999 * 0.67 = 669.33
        assert_eq!(p.amount, U256::from(669u64));
    }

    #[test]
    fn test_full_claim_equals_pending() {
        let pending = U256::MAX;
        let p = plan(
            plan_claim(pending, pct(100), &SettlementRequest::native(), U256::ZERO, None).unwrap(),
        );
        assert_eq!(p.amount, pending);
    }

    #[test]
    fn test_rounds_to_zero_skips() {
        let d = plan_claim(U256::from(1u64), pct(50), &SettlementRequest::native(), U256::ZERO, None)
            .unwrap();
        assert_eq!(d, ClaimDecision::Skip { reason: SKIP_ROUNDS_TO_ZERO });
    }

    #[test]
    fn test_path_takes_precedence_over_token() {
        let token = Address::repeat_byte(0xcc);
        let path = vec![Address::repeat_byte(0xbb), token];
        let request = SettlementRequest {
            token_out: Some(token),
            path: Some(path.clone()),
        };
        let p = plan(plan_claim(U256::from(100u64), pct(10), &request, U256::from(5u64), None).unwrap());
        assert_eq!(p.settlement, Settlement::Path(path));
        assert_eq!(p.min_out, U256::from(5u64));
    }

    #[test]
    fn test_token_settlement() {
        let token = Address::repeat_byte(0xcc);
        let p = plan(
            plan_claim(
                U256::from(100u64),
                pct(10),
                &SettlementRequest::token(token),
                U256::from(3u64),
                Some(60),
            )
            .unwrap(),
        );
        assert_eq!(p.settlement, Settlement::Token(token));
        assert_eq!(p.min_out, U256::from(3u64));
        assert!(p.deadline >= now_secs() + 59);
        assert!(p.deadline <= now_secs() + 60);
    }

    #[test]
    fn test_zero_token_means_native() {
        let p = plan(
            plan_claim(
                U256::from(100u64),
                pct(10),
                &SettlementRequest::token(Address::ZERO),
                U256::from(3u64),
                None,
            )
            .unwrap(),
        );
        assert_eq!(p.settlement, Settlement::Native);
        assert_eq!(p.min_out, U256::ZERO);
    }

    #[test]
    fn test_short_path_rejected() {
        let request = SettlementRequest::path(vec![Address::repeat_byte(1)]);
        let err = plan_claim(U256::from(100u64), pct(10), &request, U256::ZERO, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_default_deadline_window() {
        let before = now_secs();
        let p = plan(
            plan_claim(U256::from(100u64), pct(100), &SettlementRequest::native(), U256::ZERO, None)
                .unwrap(),
        );
        assert!(p.deadline >= before + DEFAULT_DEADLINE_SECS);
        assert!(p.deadline <= now_secs() + DEFAULT_DEADLINE_SECS);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CALL TUPLES - exact positional parameters for CoreSwap / ReferralEngine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::codec::{address_arg, path_arg, u256_arg, u64_arg};
use ctk_core::{Address, ClaimPlan, Settlement, U256};
use serde_json::Value;

/// Referral parameters shared by every single-referrer swap variant.
///
/// All-zero is a valid value: model 0, no referrer, tier 0, and the zero
/// recipient (the contract pays `msg.sender`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferralArgs {
    pub model_id: u64,
    pub referrer: Address,
    pub requested_tier: u8,
    pub recipient: Address,
}

impl ReferralArgs {
    pub fn with_referrer(model_id: u64, referrer: Address) -> Self {
        Self {
            model_id,
            referrer,
            ..Self::default()
        }
    }

    fn tail(&self) -> [Value; 4] {
        [
            u64_arg(self.model_id),
            address_arg(self.referrer),
            u64_arg(self.requested_tier as u64),
            address_arg(self.recipient),
        ]
    }
}

/// A fully resolved CoreSwap state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapCall {
    NativeForToken {
        token_out: Address,
        min_out: U256,
        deadline: u64,
        referral: ReferralArgs,
        amount_in: U256,
    },
    NativeForTokenChain {
        token_out: Address,
        min_out: U256,
        deadline: u64,
        model_id: u64,
        ref_chain: [Address; 3],
        requested_tier: u8,
        recipient: Address,
        amount_in: U256,
    },
    TokenForNative {
        token_in: Address,
        amount_in: U256,
        min_out: U256,
        deadline: u64,
        referral: ReferralArgs,
    },
    TokenForToken {
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_out: U256,
        deadline: u64,
        referral: ReferralArgs,
    },
    NativeForTokenPath {
        path: Vec<Address>,
        min_out: U256,
        deadline: u64,
        referral: ReferralArgs,
        amount_in: U256,
    },
    TokenForTokenPath {
        path: Vec<Address>,
        amount_in: U256,
        min_out: U256,
        deadline: u64,
        referral: ReferralArgs,
    },
}

impl SwapCall {
    /// Contract function name as deployed.
    pub fn function(&self) -> &'static str {
        match self {
            SwapCall::NativeForToken { .. } => "swapETHForToken",
            SwapCall::NativeForTokenChain { .. } => "swapETHForTokenChain",
            SwapCall::TokenForNative { .. } => "swapTokenForETH",
            SwapCall::TokenForToken { .. } => "swapTokenForToken",
            SwapCall::NativeForTokenPath { .. } => "swapETHForTokenPath",
            SwapCall::TokenForTokenPath { .. } => "swapTokenForTokenPath",
        }
    }

    /// Positional arguments in ABI order. Native input is not an argument;
    /// see [`SwapCall::value`].
    pub fn args(&self) -> Vec<Value> {
        let mut args = Vec::with_capacity(9);
        match self {
            SwapCall::NativeForToken {
                token_out,
                min_out,
                deadline,
                referral,
                ..
            } => {
                args.push(address_arg(*token_out));
                args.push(u256_arg(*min_out));
                args.push(u64_arg(*deadline));
                args.extend(referral.tail());
            }
            SwapCall::NativeForTokenChain {
                token_out,
                min_out,
                deadline,
                model_id,
                ref_chain,
                requested_tier,
                recipient,
                ..
            } => {
                args.push(address_arg(*token_out));
                args.push(u256_arg(*min_out));
                args.push(u64_arg(*deadline));
                args.push(u64_arg(*model_id));
                args.push(path_arg(ref_chain));
                args.push(u64_arg(*requested_tier as u64));
                args.push(address_arg(*recipient));
            }
            SwapCall::TokenForNative {
                token_in,
                amount_in,
                min_out,
                deadline,
                referral,
            } => {
                args.push(address_arg(*token_in));
                args.push(u256_arg(*amount_in));
                args.push(u256_arg(*min_out));
                args.push(u64_arg(*deadline));
                args.extend(referral.tail());
            }
            SwapCall::TokenForToken {
                token_in,
                token_out,
                amount_in,
                min_out,
                deadline,
                referral,
            } => {
                args.push(address_arg(*token_in));
                args.push(address_arg(*token_out));
                args.push(u256_arg(*amount_in));
                args.push(u256_arg(*min_out));
                args.push(u64_arg(*deadline));
                args.extend(referral.tail());
            }
            SwapCall::NativeForTokenPath {
                path,
                min_out,
                deadline,
                referral,
                ..
            } => {
                args.push(path_arg(path));
                args.push(u256_arg(*min_out));
                args.push(u64_arg(*deadline));
                args.extend(referral.tail());
            }
            SwapCall::TokenForTokenPath {
                path,
                amount_in,
                min_out,
                deadline,
                referral,
            } => {
                args.push(path_arg(path));
                args.push(u256_arg(*amount_in));
                args.push(u256_arg(*min_out));
                args.push(u64_arg(*deadline));
                args.extend(referral.tail());
            }
        }
        args
    }

    /// Native currency attached to the call (zero for token-in variants).
    pub fn value(&self) -> U256 {
        match self {
            SwapCall::NativeForToken { amount_in, .. }
            | SwapCall::NativeForTokenChain { amount_in, .. }
            | SwapCall::NativeForTokenPath { amount_in, .. } => *amount_in,
            _ => U256::ZERO,
        }
    }

    pub fn min_out(&self) -> U256 {
        match self {
            SwapCall::NativeForToken { min_out, .. }
            | SwapCall::NativeForTokenChain { min_out, .. }
            | SwapCall::TokenForNative { min_out, .. }
            | SwapCall::TokenForToken { min_out, .. }
            | SwapCall::NativeForTokenPath { min_out, .. }
            | SwapCall::TokenForTokenPath { min_out, .. } => *min_out,
        }
    }

    pub fn deadline(&self) -> u64 {
        match self {
            SwapCall::NativeForToken { deadline, .. }
            | SwapCall::NativeForTokenChain { deadline, .. }
            | SwapCall::TokenForNative { deadline, .. }
            | SwapCall::TokenForToken { deadline, .. }
            | SwapCall::NativeForTokenPath { deadline, .. }
            | SwapCall::TokenForTokenPath { deadline, .. } => *deadline,
        }
    }
}

/// A fully resolved ReferralEngine claim call.
///
/// `amount == 0` (or above pending) makes the contract pay the full balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimCall {
    Referral {
        amount: U256,
        token_out: Address,
        min_out: U256,
        deadline: u64,
        recipient: Address,
    },
    ReferralPath {
        amount: U256,
        path: Vec<Address>,
        min_out: U256,
        deadline: u64,
        recipient: Address,
    },
}

impl ClaimCall {
    /// Lower a plan into the call that settles it. Native settlement is a
    /// `claimReferral` with the zero token.
    pub fn from_plan(plan: &ClaimPlan, recipient: Address) -> Self {
        match &plan.settlement {
            Settlement::Native => ClaimCall::Referral {
                amount: plan.amount,
                token_out: Address::ZERO,
                min_out: U256::ZERO,
                deadline: plan.deadline,
                recipient,
            },
            Settlement::Token(token) => ClaimCall::Referral {
                amount: plan.amount,
                token_out: *token,
                min_out: plan.min_out,
                deadline: plan.deadline,
                recipient,
            },
            Settlement::Path(path) => ClaimCall::ReferralPath {
                amount: plan.amount,
                path: path.clone(),
                min_out: plan.min_out,
                deadline: plan.deadline,
                recipient,
            },
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            ClaimCall::Referral { .. } => "claimReferral",
            ClaimCall::ReferralPath { .. } => "claimReferralPath",
        }
    }

    pub fn args(&self) -> Vec<Value> {
        match self {
            ClaimCall::Referral {
                amount,
                token_out,
                min_out,
                deadline,
                recipient,
            } => vec![
                u256_arg(*amount),
                address_arg(*token_out),
                u256_arg(*min_out),
                u64_arg(*deadline),
                address_arg(*recipient),
            ],
            ClaimCall::ReferralPath {
                amount,
                path,
                min_out,
                deadline,
                recipient,
            } => vec![
                u256_arg(*amount),
                path_arg(path),
                u256_arg(*min_out),
                u64_arg(*deadline),
                address_arg(*recipient),
            ],
        }
    }

    pub fn amount(&self) -> U256 {
        match self {
            ClaimCall::Referral { amount, .. } | ClaimCall::ReferralPath { amount, .. } => *amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_native_for_token_tuple_order() {
        let call = SwapCall::NativeForToken {
            token_out: addr(0xAA),
            min_out: U256::from(950u64),
            deadline: 1_700_000_600,
            referral: ReferralArgs {
                model_id: 2,
                referrer: addr(0x11),
                requested_tier: 1,
                recipient: Address::ZERO,
            },
            amount_in: U256::from(1000u64),
        };
        assert_eq!(call.function(), "swapETHForToken");
        assert_eq!(
            call.args(),
            vec![
                json!(addr(0xAA).to_checksum(None)),
                json!("950"),
                json!("1700000600"),
                json!("2"),
                json!(addr(0x11).to_checksum(None)),
                json!("1"),
                json!(Address::ZERO.to_checksum(None)),
            ]
        );
        assert_eq!(call.value(), U256::from(1000u64));
    }

    #[test]
    fn test_chain_tuple_embeds_fixed_array() {
        let call = SwapCall::NativeForTokenChain {
            token_out: addr(0xAA),
            min_out: U256::ZERO,
            deadline: 10,
            model_id: 2,
            ref_chain: [addr(1), Address::ZERO, addr(3)],
            requested_tier: 0,
            recipient: Address::ZERO,
            amount_in: U256::from(5u64),
        };
        let args = call.args();
        assert_eq!(args.len(), 7);
        assert_eq!(args[4].as_array().map(|a| a.len()), Some(3));
        assert_eq!(args[4][1], json!(Address::ZERO.to_checksum(None)));
    }

    #[test]
    fn test_token_in_variants_attach_no_value() {
        let call = SwapCall::TokenForNative {
            token_in: addr(0xBB),
            amount_in: U256::from(77u64),
            min_out: U256::from(1u64),
            deadline: 10,
            referral: ReferralArgs::default(),
        };
        assert_eq!(call.function(), "swapTokenForETH");
        assert_eq!(call.value(), U256::ZERO);
        assert_eq!(call.args()[1], json!("77"));
        assert_eq!(call.args().len(), 8);

        let path_call = SwapCall::TokenForTokenPath {
            path: vec![addr(1), addr(2), addr(3)],
            amount_in: U256::from(9u64),
            min_out: U256::ZERO,
            deadline: 10,
            referral: ReferralArgs::default(),
        };
        assert_eq!(path_call.value(), U256::ZERO);
        assert_eq!(path_call.args()[0].as_array().map(|a| a.len()), Some(3));
    }

    #[test]
    fn test_claim_call_from_native_plan_zeroes_token_and_min_out() {
        let plan = ClaimPlan {
            amount: U256::from(500u64),
            settlement: Settlement::Native,
            min_out: U256::from(123u64),
            deadline: 99,
        };
        let call = ClaimCall::from_plan(&plan, addr(0x44));
        assert_eq!(call.function(), "claimReferral");
        assert_eq!(
            call.args(),
            vec![
                json!("500"),
                json!(Address::ZERO.to_checksum(None)),
                json!("0"),
                json!("99"),
                json!(addr(0x44).to_checksum(None)),
            ]
        );
    }

    #[test]
    fn test_claim_call_from_path_plan() {
        let plan = ClaimPlan {
            amount: U256::from(330u64),
            settlement: Settlement::Path(vec![addr(1), addr(2)]),
            min_out: U256::from(7u64),
            deadline: 99,
        };
        let call = ClaimCall::from_plan(&plan, Address::ZERO);
        assert_eq!(call.function(), "claimReferralPath");
        assert_eq!(call.amount(), U256::from(330u64));
        assert_eq!(call.args()[2], json!("7"));
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// C-TRACKER (CTK) - CORE MODULE
//
// Stateless rule evaluation for the CoreSwap / ReferralEngine client.
// - Tier resolution from an accumulated-volume table
// - Slippage floors (minimum acceptable output)
// - Partial referral claim planning and settlement-shape selection
// - Input validation and configuration loading
// All amounts are uint256 (U256). No floating-point anywhere.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod claim;
pub mod config;
pub mod error;
pub mod fees;
pub mod math;
pub mod slippage;
pub mod tier;
pub mod types;
pub mod validation;

pub use alloy_primitives::{address, Address, U256};
pub use claim::{plan_claim, ClaimDecision, SettlementRequest};
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use slippage::{apply_slippage, calc_deadline, resolve_min_out};
pub use tier::{determine_requested_tier, parse_tier_rules, resolve_tier, TierRule};
pub use types::{
    ClaimOutcome, ClaimPlan, FeeConfig, Percentage, Quote, Receipt, ReferralModel,
    ReferralSnapshot, Settlement,
};

/// Default transaction deadline window: 10 minutes ahead of call time.
pub const DEFAULT_DEADLINE_SECS: u64 = 600;

/// Default slippage tolerance for quoted swaps (800 bps = 8%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 800;

/// Basis-point denominator (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Referral model that takes an explicit [L1, L2, L3] chain.
pub const CHAIN_REFERRAL_MODEL_ID: u64 = 2;

/// Number of levels in an explicit referral chain.
pub const REFERRAL_CHAIN_LEN: usize = 3;

/// Current mainnet CoreSwap address (BNB Chain), after the fee-on-transfer
/// sell fallback redeploy.
pub const MAINNET_CORE_CURRENT: Address = address!("fF2B8a49Df43ed103B67f6F8E72F049aD8f330Ba");

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// C-TRACKER (CTK) - CLIENT MODULE
//
// Remote side of the CoreSwap / ReferralEngine client:
// - Collaborator traits (SwapCore, ReferralLedger, FeeManager)
// - Swap and claim call assembly (one state-changing call per invocation)
// - Referral queries and fee-aware precision quotes
// - reqwest-backed JSON contract gateway with a pluggable signer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod calls;
pub mod claims;
pub mod codec;
pub mod contracts;
pub mod gateway;
pub mod queries;
pub mod quotes;
pub mod signer;
pub mod swap;

pub use calls::{ClaimCall, ReferralArgs, SwapCall};
pub use claims::{claim_native, claim_path, claim_percentage, claim_token, ClaimArgs, ClaimPercentage};
pub use contracts::{Contracts, FeeManager, ReferralLedger, SwapCore};
#[cfg(any(test, feature = "automock"))]
pub use contracts::{MockFeeManager, MockReferralLedger, MockSwapCore};
pub use gateway::HttpGateway;
pub use quotes::{quote_buy, quote_sell, quote_token_for_token, QuoteContext};
pub use signer::{GatewayAccount, Signer};
pub use swap::{
    execute_swap, quote_best, swap_native_for_token, swap_native_for_token_chain,
    swap_native_for_token_path, swap_token_for_native, swap_token_for_token,
    swap_token_for_token_path, NativeForToken, NativeForTokenChain, PathSwap, SwapIntent,
    SwapOptions, TokenForNative, TokenForToken,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PRECISION QUOTES - fee-aware output estimates
//
// Platform fee (tier-dependent) and first-level referral fee are applied
// the way the core contract applies them: on the native input for buys,
// on the native output for sells and token→token first legs.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::contracts::{FeeManager, ReferralLedger, SwapCore};
use ctk_core::fees::{
    estimate_buy, estimate_sell, BuyEstimate, SellEstimate, TokenToTokenEstimate,
};
use ctk_core::slippage::check_slippage_bps;
use ctk_core::{Address, Result, U256, CHAIN_REFERRAL_MODEL_ID, DEFAULT_SLIPPAGE_BPS};

/// Optional collaborators and referral context for an estimate.
#[derive(Clone, Copy, Default)]
pub struct QuoteContext<'a> {
    pub fee_manager: Option<&'a dyn FeeManager>,
    pub referral: Option<&'a dyn ReferralLedger>,
    /// Account whose fee tier applies.
    pub user: Address,
    pub w_native: Option<Address>,
    pub slippage_bps: Option<u32>,
    pub referral_model_id: u64,
    pub referrer: Address,
}

impl QuoteContext<'_> {
    fn slippage(&self) -> Result<u32> {
        let bps = self.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS);
        check_slippage_bps(bps)?;
        Ok(bps)
    }
}

/// Tier 2 → premium, tier 1 → vip, anything else → default. Any fee
/// manager failure counts as zero.
pub async fn platform_fee_bps(fee_manager: Option<&dyn FeeManager>, user: Address) -> u16 {
    let Some(fee_manager) = fee_manager else {
        return 0;
    };
    let tier = match fee_manager.current_tier(user).await {
        Ok(tier) => tier,
        Err(e) => {
            log::debug!("[ctk/quote] currentTier unavailable: {}", e);
            return 0;
        }
    };
    match fee_manager.fee_config().await {
        Ok(cfg) => cfg.platform_bps_for_tier(tier),
        Err(e) => {
            log::debug!("[ctk/quote] feeConfig unavailable: {}", e);
            0
        }
    }
}

/// `levelBps[0]` of model 0 or 2 when a referrer is given and the model is
/// active; zero otherwise.
pub async fn referral_fee_bps(
    referral: Option<&dyn ReferralLedger>,
    model_id: u64,
    referrer: Address,
) -> u16 {
    let Some(referral) = referral else {
        return 0;
    };
    if referrer.is_zero() || (model_id != 0 && model_id != CHAIN_REFERRAL_MODEL_ID) {
        return 0;
    }
    match referral.referral_model(model_id).await {
        Ok(model) if model.active => model.level_bps.first().copied().unwrap_or(0),
        Ok(_) => 0,
        Err(e) => {
            log::debug!("[ctk/quote] referral model {} unavailable: {}", model_id, e);
            0
        }
    }
}

async fn gross_out<C>(core: &C, amount_in: U256, token_in: Address, token_out: Address) -> U256
where
    C: SwapCore + ?Sized,
{
    match core.quote_best_path(amount_in, token_in, token_out).await {
        Ok(quote) => quote.amount_out,
        Err(e) => {
            log::warn!("[ctk/quote] {} -> {} quote failed: {}", token_in, token_out, e);
            U256::ZERO
        }
    }
}

/// Native → token. All-zero without wNative.
pub async fn quote_buy<C>(
    core: &C,
    ctx: &QuoteContext<'_>,
    amount_in: U256,
    token_out: Address,
) -> Result<BuyEstimate>
where
    C: SwapCore + ?Sized,
{
    let slippage = ctx.slippage()?;
    let Some(w_native) = ctx.w_native else {
        return Ok(BuyEstimate::default());
    };
    let gross = gross_out(core, amount_in, w_native, token_out).await;
    let platform_bps = platform_fee_bps(ctx.fee_manager, ctx.user).await;
    let referral_bps = referral_fee_bps(ctx.referral, ctx.referral_model_id, ctx.referrer).await;
    estimate_buy(amount_in, gross, platform_bps, referral_bps, slippage)
}

/// Token → native. All-zero without wNative.
pub async fn quote_sell<C>(
    core: &C,
    ctx: &QuoteContext<'_>,
    amount_in: U256,
    token_in: Address,
) -> Result<SellEstimate>
where
    C: SwapCore + ?Sized,
{
    let slippage = ctx.slippage()?;
    let Some(w_native) = ctx.w_native else {
        return Ok(SellEstimate::default());
    };
    let gross = gross_out(core, amount_in, token_in, w_native).await;
    let platform_bps = platform_fee_bps(ctx.fee_manager, ctx.user).await;
    let referral_bps = referral_fee_bps(ctx.referral, ctx.referral_model_id, ctx.referrer).await;
    estimate_sell(gross, platform_bps, referral_bps, slippage)
}

/// Token → wNative → token, with fees taken between the legs.
pub async fn quote_token_for_token<C>(
    core: &C,
    ctx: &QuoteContext<'_>,
    amount_in: U256,
    token_in: Address,
    token_out: Address,
) -> Result<TokenToTokenEstimate>
where
    C: SwapCore + ?Sized,
{
    let slippage = ctx.slippage()?;
    let Some(w_native) = ctx.w_native else {
        return Ok(TokenToTokenEstimate::default());
    };
    let leg1 = gross_out(core, amount_in, token_in, w_native).await;
    let platform_bps = platform_fee_bps(ctx.fee_manager, ctx.user).await;
    let referral_bps = referral_fee_bps(ctx.referral, ctx.referral_model_id, ctx.referrer).await;
    let first = TokenToTokenEstimate::from_first_leg(leg1, platform_bps, referral_bps);
    let leg2 = gross_out(core, first.net_native, w_native, token_out).await;
    first.with_second_leg(leg2, slippage)
}

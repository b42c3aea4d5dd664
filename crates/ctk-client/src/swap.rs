// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SWAP CALL ASSEMBLY
//
// minOut precedence: explicit > expectedOut with slippage > fresh quote with
// slippage > zero when the quote itself fails. Inputs are validated before
// any remote round-trip; each function submits exactly one call.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::calls::{ReferralArgs, SwapCall};
use crate::contracts::SwapCore;
use ctk_core::slippage::check_slippage_bps;
use ctk_core::validation::{check_path, check_ref_chain};
use ctk_core::{
    apply_slippage, calc_deadline, resolve_min_out, Address, Error, Quote, Receipt, Result, U256,
    CHAIN_REFERRAL_MODEL_ID, DEFAULT_DEADLINE_SECS, DEFAULT_SLIPPAGE_BPS,
};

/// Knobs shared by every swap variant. `Default` gives 800 bps slippage,
/// a 600 second deadline, no referral, and a quote-derived floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapOptions {
    pub slippage_bps: Option<u32>,
    pub min_out: Option<U256>,
    pub expected_out: Option<U256>,
    pub deadline_secs: Option<u64>,
    pub referral: ReferralArgs,
}

impl SwapOptions {
    fn slippage(&self) -> Result<u32> {
        let bps = self.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS);
        check_slippage_bps(bps)?;
        Ok(bps)
    }

    fn deadline(&self) -> u64 {
        calc_deadline(self.deadline_secs.unwrap_or(DEFAULT_DEADLINE_SECS))
    }

    /// Floor from explicit or expected values only.
    fn local_min_out(&self) -> Result<Option<U256>> {
        resolve_min_out(self.min_out, self.expected_out, self.slippage()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeForToken {
    pub token_out: Address,
    pub amount_in: U256,
    /// Needed only when the floor has to be quoted.
    pub w_native: Option<Address>,
    pub options: SwapOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeForTokenChain {
    pub token_out: Address,
    pub amount_in: U256,
    /// Exactly three entries; zero for unused levels.
    pub ref_chain: Vec<Address>,
    pub w_native: Option<Address>,
    pub model_id: u64,
    pub requested_tier: u8,
    pub recipient: Address,
    pub slippage_bps: Option<u32>,
    pub min_out: Option<U256>,
    pub expected_out: Option<U256>,
    pub deadline_secs: Option<u64>,
}

impl NativeForTokenChain {
    pub fn new(token_out: Address, amount_in: U256, ref_chain: Vec<Address>) -> Self {
        Self {
            token_out,
            amount_in,
            ref_chain,
            w_native: None,
            model_id: CHAIN_REFERRAL_MODEL_ID,
            requested_tier: 0,
            recipient: Address::ZERO,
            slippage_bps: None,
            min_out: None,
            expected_out: None,
            deadline_secs: None,
        }
    }

    fn options(&self) -> SwapOptions {
        SwapOptions {
            slippage_bps: self.slippage_bps,
            min_out: self.min_out,
            expected_out: self.expected_out,
            deadline_secs: self.deadline_secs,
            referral: ReferralArgs::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenForNative {
    pub token_in: Address,
    pub amount_in: U256,
    pub w_native: Option<Address>,
    pub options: SwapOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenForToken {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub options: SwapOptions,
}

/// Explicit route. Path variants never quote: without an explicit or
/// expected output the floor is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSwap {
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub options: SwapOptions,
}

/// High-level intent; the zero address stands for the native currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapIntent {
    pub from_token: Address,
    pub to_token: Address,
    pub amount_in: U256,
    pub w_native: Option<Address>,
    pub options: SwapOptions,
}

// ─────────────────────────────────────────────────────────────────
// QUOTING
// ─────────────────────────────────────────────────────────────────

pub async fn quote_best<C>(
    core: &C,
    amount_in: U256,
    token_in: Address,
    token_out: Address,
) -> Result<Quote>
where
    C: SwapCore + ?Sized,
{
    core.quote_best_path(amount_in, token_in, token_out).await
}

/// Quote-derived floor. A failed quote is advisory: it degrades to zero.
async fn quoted_min_out<C>(
    core: &C,
    amount_in: U256,
    token_in: Address,
    token_out: Address,
    slippage_bps: u32,
) -> Result<U256>
where
    C: SwapCore + ?Sized,
{
    match core.quote_best_path(amount_in, token_in, token_out).await {
        Ok(quote) => apply_slippage(quote.amount_out, slippage_bps),
        Err(e) => {
            log::warn!(
                "[ctk/swap] quote {} -> {} failed, submitting without a floor: {}",
                token_in,
                token_out,
                e
            );
            Ok(U256::ZERO)
        }
    }
}

/// Local floor if one resolves, otherwise a quote of `amount_in` from
/// `w_native` to `token_out`. Quoting without wNative is a missing context.
async fn native_in_min_out<C>(
    core: &C,
    options: &SwapOptions,
    amount_in: U256,
    w_native: Option<Address>,
    token_out: Address,
) -> Result<U256>
where
    C: SwapCore + ?Sized,
{
    if let Some(floor) = options.local_min_out()? {
        return Ok(floor);
    }
    let w_native =
        w_native.ok_or_else(|| Error::missing("wNative address is required to quote"))?;
    quoted_min_out(core, amount_in, w_native, token_out, options.slippage()?).await
}

async fn submit<C>(core: &C, call: SwapCall) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    let function = call.function();
    log::debug!(
        "[ctk/swap] {} min_out={} deadline={} value={}",
        function,
        call.min_out(),
        call.deadline(),
        call.value()
    );
    let receipt = core.submit(call).await?;
    log::info!("[ctk/swap] {} confirmed: {}", function, receipt.tx_hash);
    Ok(receipt)
}

// ─────────────────────────────────────────────────────────────────
// SWAP VARIANTS
// ─────────────────────────────────────────────────────────────────

pub async fn swap_native_for_token<C>(core: &C, req: &NativeForToken) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    let min_out =
        native_in_min_out(core, &req.options, req.amount_in, req.w_native, req.token_out).await?;
    submit(
        core,
        SwapCall::NativeForToken {
            token_out: req.token_out,
            min_out,
            deadline: req.options.deadline(),
            referral: req.options.referral,
            amount_in: req.amount_in,
        },
    )
    .await
}

/// Explicit [L1, L2, L3] referral chain. The chain length is checked before
/// anything touches the network.
pub async fn swap_native_for_token_chain<C>(core: &C, req: &NativeForTokenChain) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    let ref_chain = check_ref_chain(&req.ref_chain)?;
    let options = req.options();
    let min_out =
        native_in_min_out(core, &options, req.amount_in, req.w_native, req.token_out).await?;
    submit(
        core,
        SwapCall::NativeForTokenChain {
            token_out: req.token_out,
            min_out,
            deadline: options.deadline(),
            model_id: req.model_id,
            ref_chain,
            requested_tier: req.requested_tier,
            recipient: req.recipient,
            amount_in: req.amount_in,
        },
    )
    .await
}

/// Token → native. Quotes `token_in → wNative` when no local floor resolves
/// and wNative is known; otherwise the floor is zero.
pub async fn swap_token_for_native<C>(core: &C, req: &TokenForNative) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    let min_out = match req.options.local_min_out()? {
        Some(floor) => floor,
        None => match req.w_native {
            Some(w_native) => {
                quoted_min_out(
                    core,
                    req.amount_in,
                    req.token_in,
                    w_native,
                    req.options.slippage()?,
                )
                .await?
            }
            None => U256::ZERO,
        },
    };
    submit(
        core,
        SwapCall::TokenForNative {
            token_in: req.token_in,
            amount_in: req.amount_in,
            min_out,
            deadline: req.options.deadline(),
            referral: req.options.referral,
        },
    )
    .await
}

pub async fn swap_token_for_token<C>(core: &C, req: &TokenForToken) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    let min_out = match req.options.local_min_out()? {
        Some(floor) => floor,
        None => {
            quoted_min_out(
                core,
                req.amount_in,
                req.token_in,
                req.token_out,
                req.options.slippage()?,
            )
            .await?
        }
    };
    submit(
        core,
        SwapCall::TokenForToken {
            token_in: req.token_in,
            token_out: req.token_out,
            amount_in: req.amount_in,
            min_out,
            deadline: req.options.deadline(),
            referral: req.options.referral,
        },
    )
    .await
}

pub async fn swap_native_for_token_path<C>(core: &C, req: &PathSwap) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    check_path(&req.path)?;
    let min_out = req.options.local_min_out()?.unwrap_or(U256::ZERO);
    submit(
        core,
        SwapCall::NativeForTokenPath {
            path: req.path.clone(),
            min_out,
            deadline: req.options.deadline(),
            referral: req.options.referral,
            amount_in: req.amount_in,
        },
    )
    .await
}

pub async fn swap_token_for_token_path<C>(core: &C, req: &PathSwap) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    check_path(&req.path)?;
    let min_out = req.options.local_min_out()?.unwrap_or(U256::ZERO);
    submit(
        core,
        SwapCall::TokenForTokenPath {
            path: req.path.clone(),
            amount_in: req.amount_in,
            min_out,
            deadline: req.options.deadline(),
            referral: req.options.referral,
        },
    )
    .await
}

/// Dispatch on the native sentinel. Native → native is rejected.
pub async fn execute_swap<C>(core: &C, intent: &SwapIntent) -> Result<Receipt>
where
    C: SwapCore + ?Sized,
{
    let from_native = intent.from_token.is_zero();
    let to_native = intent.to_token.is_zero();
    match (from_native, to_native) {
        (true, false) => {
            swap_native_for_token(
                core,
                &NativeForToken {
                    token_out: intent.to_token,
                    amount_in: intent.amount_in,
                    w_native: intent.w_native,
                    options: intent.options,
                },
            )
            .await
        }
        (false, true) => {
            swap_token_for_native(
                core,
                &TokenForNative {
                    token_in: intent.from_token,
                    amount_in: intent.amount_in,
                    w_native: intent.w_native,
                    options: intent.options,
                },
            )
            .await
        }
        (false, false) => {
            swap_token_for_token(
                core,
                &TokenForToken {
                    token_in: intent.from_token,
                    token_out: intent.to_token,
                    amount_in: intent.amount_in,
                    options: intent.options,
                },
            )
            .await
        }
        (true, true) => Err(Error::invalid("native to native swap is not supported")),
    }
}

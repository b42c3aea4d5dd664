// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PRECISION QUOTE MATH
//
// Local estimate of what CoreSwap actually delivers once the platform fee and
// the first-level referral fee are taken. Buys take fees from the native
// input, sells from the native output. Output is assumed to scale linearly
// with the effective input. Price impact is reported in integer bps.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::Result;
use crate::math::{mul_div_floor, mul_ratio};
use crate::slippage::apply_slippage;
use crate::BPS_DENOMINATOR;
use alloy_primitives::U256;
use serde::Serialize;

/// Fee share of an amount at `bps`.
pub fn fee_at(amount: U256, bps: u16) -> U256 {
    mul_ratio(amount, bps as u64, BPS_DENOMINATOR as u64)
}

/// `(gross - net) / gross` in bps; zero when `gross` is zero.
pub fn price_impact_bps(gross: U256, net: U256) -> u32 {
    if gross.is_zero() || net >= gross {
        return 0;
    }
    let impact = mul_div_floor(gross - net, U256::from(BPS_DENOMINATOR), gross);
    impact.saturating_to::<u32>()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuyEstimate {
    pub gross_quote: U256,
    pub platform_fee_bps: u16,
    pub platform_fee: U256,
    pub referral_fee_bps: u16,
    pub referral_fee: U256,
    pub net_for_swap: U256,
    pub estimated_out: U256,
    pub min_out: U256,
    pub price_impact_bps: u32,
}

/// Native → token. Fees come off the native input before the swap.
pub fn estimate_buy(
    amount_in: U256,
    gross_out: U256,
    platform_fee_bps: u16,
    referral_fee_bps: u16,
    slippage_bps: u32,
) -> Result<BuyEstimate> {
    let platform_fee = fee_at(amount_in, platform_fee_bps);
    let referral_fee = fee_at(amount_in, referral_fee_bps);
    let net_for_swap = amount_in
        .saturating_sub(platform_fee)
        .saturating_sub(referral_fee);
    let estimated_out = if gross_out.is_zero() {
        U256::ZERO
    } else {
        mul_div_floor(gross_out, net_for_swap, amount_in)
    };
    Ok(BuyEstimate {
        gross_quote: gross_out,
        platform_fee_bps,
        platform_fee,
        referral_fee_bps,
        referral_fee,
        net_for_swap,
        estimated_out,
        min_out: apply_slippage(estimated_out, slippage_bps)?,
        price_impact_bps: price_impact_bps(gross_out, estimated_out),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SellEstimate {
    pub gross_quote: U256,
    pub platform_fee_bps: u16,
    pub platform_fee: U256,
    pub referral_fee_bps: u16,
    pub referral_fee: U256,
    pub net_out: U256,
    pub min_out: U256,
    pub price_impact_bps: u32,
}

/// Token → native. Fees come off the native output.
pub fn estimate_sell(
    gross_out: U256,
    platform_fee_bps: u16,
    referral_fee_bps: u16,
    slippage_bps: u32,
) -> Result<SellEstimate> {
    let platform_fee = fee_at(gross_out, platform_fee_bps);
    let referral_fee = fee_at(gross_out, referral_fee_bps);
    let net_out = gross_out
        .saturating_sub(platform_fee)
        .saturating_sub(referral_fee);
    Ok(SellEstimate {
        gross_quote: gross_out,
        platform_fee_bps,
        platform_fee,
        referral_fee_bps,
        referral_fee,
        net_out,
        min_out: apply_slippage(net_out, slippage_bps)?,
        price_impact_bps: price_impact_bps(gross_out, net_out),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenToTokenEstimate {
    pub leg1_out: U256,
    pub platform_fee_bps: u16,
    pub platform_fee: U256,
    pub referral_fee_bps: u16,
    pub referral_fee: U256,
    pub net_native: U256,
    pub leg2_out: U256,
    pub min_out: U256,
    pub price_impact_bps: u32,
}

impl TokenToTokenEstimate {
    /// First leg: token → wNative, fees taken from the unwrapped output.
    pub fn from_first_leg(leg1_out: U256, platform_fee_bps: u16, referral_fee_bps: u16) -> Self {
        let platform_fee = fee_at(leg1_out, platform_fee_bps);
        let referral_fee = fee_at(leg1_out, referral_fee_bps);
        Self {
            leg1_out,
            platform_fee_bps,
            platform_fee,
            referral_fee_bps,
            referral_fee,
            net_native: leg1_out
                .saturating_sub(platform_fee)
                .saturating_sub(referral_fee),
            ..Self::default()
        }
    }

    /// Second leg: wNative → token, quoted on `net_native`.
    pub fn with_second_leg(mut self, leg2_out: U256, slippage_bps: u32) -> Result<Self> {
        self.leg2_out = leg2_out;
        self.min_out = apply_slippage(leg2_out, slippage_bps)?;
        // Impact against the destination amount the fees would have bought.
        self.price_impact_bps = if leg2_out.is_zero() {
            0
        } else {
            let combined = leg2_out
                .saturating_add(self.platform_fee)
                .saturating_add(self.referral_fee);
            price_impact_bps(combined, leg2_out)
        };
        Ok(self)
    }
}

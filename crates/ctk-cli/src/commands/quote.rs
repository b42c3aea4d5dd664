use crate::commands::common::{amount, CliResult, Context};
use crate::print_info;
use colored::Colorize;
use ctk_client::{quote_best, quote_buy, quote_sell, quote_token_for_token, QuoteContext};
use ctk_client::ReferralLedger;
use ctk_core::validation::parse_address;
use ctk_core::{Address, ApiConfig, U256};

/// Handle estimate subcommands.
pub async fn handle(action: crate::EstimateCommands, ctx: &Context) -> CliResult {
    let contracts = ctx.contracts()?;
    let core = &contracts.core;

    let fees = match &action {
        crate::EstimateCommands::Buy { fees, .. }
        | crate::EstimateCommands::Sell { fees, .. }
        | crate::EstimateCommands::Token { fees, .. } => fees.clone(),
    };
    let (user, referrer) = fee_parties(&fees, &ctx.config)?;
    let quote_ctx = QuoteContext {
        fee_manager: contracts.fee_manager(),
        referral: Some(&contracts.referral as &dyn ReferralLedger),
        user,
        w_native: contracts.resolve_w_native().await,
        slippage_bps: fees.slippage_bps,
        referral_model_id: fees.model_id,
        referrer,
    };
    if quote_ctx.w_native.is_none() {
        print_info("wNative is neither configured nor reported; estimates will be zero");
    }

    match action {
        crate::EstimateCommands::Buy {
            token_out,
            amount_in,
            ..
        } => {
            let est =
                quote_buy(core, &quote_ctx, amount(&amount_in)?, parse_address(&token_out)?)
                    .await?;
            header("Buy Estimate (native → token)");
            row("Gross Quote", est.gross_quote);
            fee_row("Platform Fee", est.platform_fee, est.platform_fee_bps);
            fee_row("Referral Fee", est.referral_fee, est.referral_fee_bps);
            row("Net For Swap", est.net_for_swap);
            row("Estimated Out", est.estimated_out);
            row("Min Out", est.min_out);
            impact(est.price_impact_bps);
        }
        crate::EstimateCommands::Sell {
            token_in,
            amount_in,
            ..
        } => {
            let est =
                quote_sell(core, &quote_ctx, amount(&amount_in)?, parse_address(&token_in)?)
                    .await?;
            header("Sell Estimate (token → native)");
            row("Gross Quote", est.gross_quote);
            fee_row("Platform Fee", est.platform_fee, est.platform_fee_bps);
            fee_row("Referral Fee", est.referral_fee, est.referral_fee_bps);
            row("Net Out", est.net_out);
            row("Min Out", est.min_out);
            impact(est.price_impact_bps);
        }
        crate::EstimateCommands::Token {
            token_in,
            token_out,
            amount_in,
            ..
        } => {
            let est = quote_token_for_token(
                core,
                &quote_ctx,
                amount(&amount_in)?,
                parse_address(&token_in)?,
                parse_address(&token_out)?,
            )
            .await?;
            header("Token Estimate (token → wNative → token)");
            row("Leg 1 Out", est.leg1_out);
            fee_row("Platform Fee", est.platform_fee, est.platform_fee_bps);
            fee_row("Referral Fee", est.referral_fee, est.referral_fee_bps);
            row("Net Native", est.net_native);
            row("Leg 2 Out", est.leg2_out);
            row("Min Out", est.min_out);
            impact(est.price_impact_bps);
        }
    }
    Ok(())
}

/// Fee-tier account and level-1 referrer: flags first, then the signer and
/// `REFERRER` from configuration.
fn fee_parties(
    fees: &crate::EstimateArgs,
    config: &ApiConfig,
) -> ctk_core::Result<(Address, Address)> {
    let user = match fees.user.as_deref() {
        Some(raw) => parse_address(raw)?,
        None => config.signer_address.unwrap_or(Address::ZERO),
    };
    let referrer = match fees.referrer.as_deref() {
        Some(raw) => parse_address(raw)?,
        None => config.referrer.unwrap_or(Address::ZERO),
    };
    Ok((user, referrer))
}

/// Best-path quote straight from CoreSwap.
pub async fn best(ctx: &Context, amount_in: &str, token_in: &str, token_out: &str) -> CliResult {
    let core = ctx.contracts()?.core;
    let quote = quote_best(
        &core,
        amount(amount_in)?,
        parse_address(token_in)?,
        parse_address(token_out)?,
    )
    .await?;

    header("Best Path Quote");
    println!("  {:<16} {}", "Router:".bold(), quote.router.to_string().yellow());
    let hops: Vec<String> = quote.path.iter().map(|a| a.to_string()).collect();
    println!("  {:<16} {}", "Path:".bold(), hops.join(" → "));
    row("Amount Out", quote.amount_out);
    Ok(())
}

fn header(title: &str) {
    println!("{}", title.cyan().bold());
    println!("{}", "─".repeat(50));
}

fn row(label: &str, value: U256) {
    println!("  {:<16} {}", format!("{}:", label).bold(), value.to_string().green());
}

fn fee_row(label: &str, value: U256, bps: u16) {
    println!(
        "  {:<16} {} ({} bps)",
        format!("{}:", label).bold(),
        value.to_string().yellow(),
        bps
    );
}

fn impact(bps: u32) {
    println!("  {:<16} {} bps", "Price Impact:".bold(), bps.to_string().white());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_parties_flags_then_config() {
        let config = ApiConfig {
            signer_address: Some(Address::repeat_byte(0x55)),
            referrer: Some(Address::repeat_byte(0x11)),
            ..ApiConfig::default()
        };
        let defaults = crate::EstimateArgs::default();
        assert_eq!(
            fee_parties(&defaults, &config).unwrap(),
            (Address::repeat_byte(0x55), Address::repeat_byte(0x11))
        );

        let flags = crate::EstimateArgs {
            referrer: Some(Address::repeat_byte(0x22).to_string()),
            ..crate::EstimateArgs::default()
        };
        let (_, referrer) = fee_parties(&flags, &config).unwrap();
        assert_eq!(referrer, Address::repeat_byte(0x22));

        let malformed = crate::EstimateArgs {
            referrer: Some("0x1234".to_string()),
            ..crate::EstimateArgs::default()
        };
        assert!(fee_parties(&malformed, &config)
            .unwrap_err()
            .is_invalid_argument());
    }
}

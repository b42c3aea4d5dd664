use crate::commands::common::{addresses, amount, opt_address, opt_amount, print_receipt};
use crate::commands::common::{CliResult, Context};
use crate::print_info;
use ctk_client::{
    queries, swap_native_for_token, swap_native_for_token_chain, swap_native_for_token_path,
    swap_token_for_native, swap_token_for_token, swap_token_for_token_path, Contracts,
    NativeForToken, NativeForTokenChain, PathSwap, ReferralArgs, SwapOptions, TokenForNative,
    TokenForToken,
};
use ctk_core::validation::{parse_address, validate_ref_chain};
use ctk_core::{determine_requested_tier, resolve_tier, Address, ApiConfig, U256};

/// Handle swap subcommands.
pub async fn handle(action: crate::SwapCommands, ctx: &Context) -> CliResult {
    let contracts = ctx.contracts()?;
    let core = &contracts.core;

    let receipt = match action {
        crate::SwapCommands::Buy {
            token_out,
            amount_in,
            opts,
        } => {
            let tier = requested_tier(&contracts, &ctx.config, &opts).await?;
            let req = NativeForToken {
                token_out: parse_address(&token_out)?,
                amount_in: amount(&amount_in)?,
                w_native: contracts.resolve_w_native().await,
                options: swap_options(&opts, &ctx.config, tier)?,
            };
            print_info(&format!("Swapping {} native → {}", req.amount_in, req.token_out));
            swap_native_for_token(core, &req).await?
        }
        crate::SwapCommands::Sell {
            token_in,
            amount_in,
            opts,
        } => {
            let tier = requested_tier(&contracts, &ctx.config, &opts).await?;
            let req = TokenForNative {
                token_in: parse_address(&token_in)?,
                amount_in: amount(&amount_in)?,
                w_native: contracts.resolve_w_native().await,
                options: swap_options(&opts, &ctx.config, tier)?,
            };
            print_info(&format!("Swapping {} {} → native", req.amount_in, req.token_in));
            swap_token_for_native(core, &req).await?
        }
        crate::SwapCommands::Token {
            token_in,
            token_out,
            amount_in,
            opts,
        } => {
            let tier = requested_tier(&contracts, &ctx.config, &opts).await?;
            let req = TokenForToken {
                token_in: parse_address(&token_in)?,
                token_out: parse_address(&token_out)?,
                amount_in: amount(&amount_in)?,
                options: swap_options(&opts, &ctx.config, tier)?,
            };
            print_info(&format!(
                "Swapping {} {} → {}",
                req.amount_in, req.token_in, req.token_out
            ));
            swap_token_for_token(core, &req).await?
        }
        crate::SwapCommands::BuyPath {
            path,
            amount_in,
            opts,
        } => {
            let tier = requested_tier(&contracts, &ctx.config, &opts).await?;
            let req = PathSwap {
                path: addresses(&path)?,
                amount_in: amount(&amount_in)?,
                options: swap_options(&opts, &ctx.config, tier)?,
            };
            print_info(&format!("Swapping {} native along {} hops", req.amount_in, req.path.len()));
            swap_native_for_token_path(core, &req).await?
        }
        crate::SwapCommands::TokenPath {
            path,
            amount_in,
            opts,
        } => {
            let tier = requested_tier(&contracts, &ctx.config, &opts).await?;
            let req = PathSwap {
                path: addresses(&path)?,
                amount_in: amount(&amount_in)?,
                options: swap_options(&opts, &ctx.config, tier)?,
            };
            print_info(&format!("Swapping {} along {} hops", req.amount_in, req.path.len()));
            swap_token_for_token_path(core, &req).await?
        }
        crate::SwapCommands::BuyChain {
            token_out,
            amount_in,
            ref_chain,
            model_id,
            requested_tier: explicit_tier,
            volume,
            recipient,
            slippage_bps,
            min_out,
            expected_out,
            deadline_secs,
        } => {
            let mut req = NativeForTokenChain::new(
                parse_address(&token_out)?,
                amount(&amount_in)?,
                validate_ref_chain(&ref_chain)?.to_vec(),
            );
            req.w_native = contracts.resolve_w_native().await;
            req.model_id = model_id;
            req.requested_tier =
                resolve_requested_tier(&contracts, &ctx.config, explicit_tier, volume.as_deref())
                    .await?;
            req.recipient = opt_address(recipient.as_deref())?.unwrap_or(Address::ZERO);
            req.slippage_bps = slippage_bps;
            req.min_out = opt_amount(min_out.as_deref())?;
            req.expected_out = opt_amount(expected_out.as_deref())?;
            req.deadline_secs = deadline_secs;
            print_info(&format!(
                "Swapping {} native → {} (model {}, chain of {})",
                req.amount_in,
                req.token_out,
                req.model_id,
                req.ref_chain.len()
            ));
            swap_native_for_token_chain(core, &req).await?
        }
    };

    print_receipt("Swap confirmed!", &receipt);
    Ok(())
}

async fn requested_tier(
    contracts: &Contracts,
    config: &ApiConfig,
    opts: &crate::SwapArgs,
) -> ctk_core::Result<u8> {
    resolve_requested_tier(contracts, config, opts.requested_tier, opts.volume.as_deref()).await
}

/// `--requested-tier` when given. Otherwise the configured rule table applied
/// to `--volume`, else to the signer's snapshot volume, else to zero volume.
async fn resolve_requested_tier(
    contracts: &Contracts,
    config: &ApiConfig,
    explicit: Option<u8>,
    volume: Option<&str>,
) -> ctk_core::Result<u8> {
    if let Some(tier) = explicit {
        return Ok(tier);
    }
    let rules = config.tier_rules();
    if let Some(raw) = volume {
        return determine_requested_tier(raw, &rules);
    }
    let Some(account) = config.signer_address else {
        return Ok(resolve_tier(U256::ZERO, &rules));
    };
    match queries::tier_for_account(&contracts.referral, account, config.fee_manager_address, &rules)
        .await
    {
        Ok(tier) => Ok(tier),
        Err(e) => {
            log::warn!("volume lookup for {} failed, assuming zero: {}", account, e);
            Ok(resolve_tier(U256::ZERO, &rules))
        }
    }
}

/// Flags → options. The referrer falls back to the configured one.
fn swap_options(
    opts: &crate::SwapArgs,
    config: &ApiConfig,
    requested_tier: u8,
) -> ctk_core::Result<SwapOptions> {
    let referrer = opt_address(opts.referrer.as_deref())?
        .or(config.referrer)
        .unwrap_or(Address::ZERO);
    Ok(SwapOptions {
        slippage_bps: opts.slippage_bps,
        min_out: opt_amount(opts.min_out.as_deref())?,
        expected_out: opt_amount(opts.expected_out.as_deref())?,
        deadline_secs: opts.deadline_secs,
        referral: ReferralArgs {
            model_id: opts.model_id,
            referrer,
            requested_tier,
            recipient: opt_address(opts.recipient.as_deref())?.unwrap_or(Address::ZERO),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctk_client::SwapCall;

    fn tiered_config(signer: Option<Address>) -> ApiConfig {
        ApiConfig {
            rpc_url: Some("http://127.0.0.1:1".to_string()),
            core_address: Some(Address::repeat_byte(0x01)),
            referral_address: Some(Address::repeat_byte(0x02)),
            signer_address: signer,
            tier_rules_json: Some(
                r#"[{"minVolume":"0","tier":1},{"minVolume":"10000","tier":2}]"#.to_string(),
            ),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_swap_options_referrer_fallback() {
        let config = ApiConfig {
            referrer: Some(Address::repeat_byte(0x11)),
            ..ApiConfig::default()
        };
        let opts = crate::SwapArgs {
            min_out: Some("1000".to_string()),
            model_id: 1,
            ..crate::SwapArgs::default()
        };
        let options = swap_options(&opts, &config, 0).unwrap();
        assert_eq!(options.referral.referrer, Address::repeat_byte(0x11));
        assert_eq!(options.referral.model_id, 1);
        assert_eq!(options.min_out, Some(U256::from(1000u64)));
        assert_eq!(options.referral.recipient, Address::ZERO);

        let explicit = crate::SwapArgs {
            referrer: Some(Address::repeat_byte(0x22).to_string()),
            ..crate::SwapArgs::default()
        };
        let options = swap_options(&explicit, &config, 0).unwrap();
        assert_eq!(options.referral.referrer, Address::repeat_byte(0x22));
    }

    #[test]
    fn test_swap_options_rejects_bad_amount() {
        let opts = crate::SwapArgs {
            expected_out: Some("-5".to_string()),
            ..crate::SwapArgs::default()
        };
        assert!(swap_options(&opts, &ApiConfig::default(), 0).is_err());
    }

    #[tokio::test]
    async fn test_configured_table_sets_swap_tier() {
        let config = tiered_config(None);
        let contracts = Contracts::connect(&config, None).unwrap();
        let opts = crate::SwapArgs::default();

        let tier = requested_tier(&contracts, &config, &opts).await.unwrap();
        assert_eq!(tier, 1);

        let call = SwapCall::NativeForToken {
            token_out: Address::repeat_byte(0xBB),
            min_out: U256::from(1u64),
            deadline: 1_700_000_600,
            referral: swap_options(&opts, &config, tier).unwrap().referral,
            amount_in: U256::from(500u64),
        };
        assert_eq!(call.args()[5].as_str(), Some("1"));
    }

    #[tokio::test]
    async fn test_volume_flag_and_explicit_tier() {
        let config = tiered_config(None);
        let contracts = Contracts::connect(&config, None).unwrap();

        let by_volume = crate::SwapArgs {
            volume: Some("12500".to_string()),
            ..crate::SwapArgs::default()
        };
        assert_eq!(requested_tier(&contracts, &config, &by_volume).await.unwrap(), 2);

        let explicit = crate::SwapArgs {
            requested_tier: Some(0),
            volume: Some("12500".to_string()),
            ..crate::SwapArgs::default()
        };
        assert_eq!(requested_tier(&contracts, &config, &explicit).await.unwrap(), 0);

        let bad = crate::SwapArgs {
            volume: Some("lots".to_string()),
            ..crate::SwapArgs::default()
        };
        assert!(requested_tier(&contracts, &config, &bad)
            .await
            .unwrap_err()
            .is_invalid_argument());
    }

    #[tokio::test]
    async fn test_failed_volume_lookup_assumes_zero() {
        // Nothing listens on port 1, so the snapshot read fails.
        let config = tiered_config(Some(Address::repeat_byte(0x55)));
        let contracts = Contracts::connect(&config, None).unwrap();
        let tier = requested_tier(&contracts, &config, &crate::SwapArgs::default())
            .await
            .unwrap();
        assert_eq!(tier, 1);
    }
}

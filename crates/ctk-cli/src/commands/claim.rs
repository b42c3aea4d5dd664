use crate::commands::common::{addresses, opt_address, opt_amount, print_receipt};
use crate::commands::common::{CliResult, Context};
use crate::print_info;
use colored::Colorize;
use ctk_client::{claim_native, claim_path, claim_percentage, claim_token, ClaimArgs, ClaimPercentage};
use ctk_core::validation::validate_claim_path;
use ctk_core::{Address, ApiConfig, ClaimOutcome, Error, U256};

/// Handle claim subcommands.
pub async fn handle(action: crate::ClaimCommands, ctx: &Context) -> CliResult {
    let referral = ctx.contracts()?.referral;

    match action {
        crate::ClaimCommands::Native { amount, recipient } => {
            let amount = opt_amount(amount.as_deref())?.unwrap_or(U256::ZERO);
            let recipient = opt_address(recipient.as_deref())?.unwrap_or(Address::ZERO);
            print_info(&format!("Claiming {} in native", describe(amount)));
            let receipt = claim_native(&referral, amount, recipient).await?;
            print_receipt("Referral claimed!", &receipt);
        }
        crate::ClaimCommands::Token {
            token_out,
            amount,
            min_out,
            recipient,
            deadline_secs,
        } => {
            let token_out = opt_address(token_out.as_deref())?
                .or(ctx.config.claim_token_out)
                .ok_or_else(|| Error::missing("no --token-out given and CLAIM_TOKEN_OUT unset"))?;
            let args = claim_args(amount, min_out, recipient, deadline_secs)?;
            print_info(&format!("Claiming {} as {}", describe(args.amount), token_out));
            let receipt = claim_token(&referral, token_out, &args).await?;
            print_receipt("Referral claimed!", &receipt);
        }
        crate::ClaimCommands::Path {
            path,
            amount,
            min_out,
            recipient,
            deadline_secs,
        } => {
            let path = validate_claim_path(&path)?;
            let args = claim_args(amount, min_out, recipient, deadline_secs)?;
            print_info(&format!(
                "Claiming {} along {} hops",
                describe(args.amount),
                path.len()
            ));
            let receipt = claim_path(&referral, &path, &args).await?;
            print_receipt("Referral claimed!", &receipt);
        }
        crate::ClaimCommands::Percent {
            percent,
            token_out,
            path,
            min_out,
            recipient,
            deadline_secs,
        } => {
            let req = percentage_request(
                &ctx.config,
                percent,
                token_out.as_deref(),
                path.as_deref(),
                min_out.as_deref(),
                recipient.as_deref(),
                deadline_secs,
            )?;
            print_info(&format!("Claiming {}% of pending", req.percentage));
            match claim_percentage(&referral, &req).await? {
                ClaimOutcome::Claimed { plan, receipt } => {
                    print_receipt("Referral claimed!", &receipt);
                    println!("  {}: {}", "Amount".bold(), plan.amount.to_string().green());
                    println!("  {}: {}", "Settlement".bold(), plan.settlement.label());
                }
                ClaimOutcome::Skipped { reason } => {
                    print_info(&format!("Nothing claimed: {}", reason));
                }
            }
        }
    }

    Ok(())
}

fn describe(amount: U256) -> String {
    if amount.is_zero() {
        "full pending balance".to_string()
    } else {
        amount.to_string()
    }
}

fn claim_args(
    amount: Option<String>,
    min_out: Option<String>,
    recipient: Option<String>,
    deadline_secs: Option<u64>,
) -> ctk_core::Result<ClaimArgs> {
    Ok(ClaimArgs {
        amount: opt_amount(amount.as_deref())?.unwrap_or(U256::ZERO),
        min_out: opt_amount(min_out.as_deref())?.unwrap_or(U256::ZERO),
        recipient: opt_address(recipient.as_deref())?.unwrap_or(Address::ZERO),
        deadline_secs,
    })
}

/// Flags first, then CLAIM_PERCENT / CLAIM_TOKEN_OUT from configuration.
fn percentage_request(
    config: &ApiConfig,
    percent: Option<u32>,
    token_out: Option<&str>,
    path: Option<&[String]>,
    min_out: Option<&str>,
    recipient: Option<&str>,
    deadline_secs: Option<u64>,
) -> ctk_core::Result<ClaimPercentage> {
    Ok(ClaimPercentage {
        percentage: percent.unwrap_or(config.claim_percent),
        token_out: opt_address(token_out)?.or(config.claim_token_out),
        path: path.map(addresses).transpose()?,
        min_out: opt_amount(min_out)?.unwrap_or(U256::ZERO),
        recipient: opt_address(recipient)?.unwrap_or(Address::ZERO),
        deadline_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_request_falls_back_to_config() {
        let config = ApiConfig {
            claim_percent: 25,
            claim_token_out: Some(Address::repeat_byte(0x0C)),
            ..ApiConfig::default()
        };
        let req = percentage_request(&config, None, None, None, None, None, None).unwrap();
        assert_eq!(req.percentage, 25);
        assert_eq!(req.token_out, Some(Address::repeat_byte(0x0C)));
        assert_eq!(req.path, None);
        assert_eq!(req.recipient, Address::ZERO);
    }

    #[test]
    fn test_percentage_request_flags_win() {
        let config = ApiConfig {
            claim_percent: 25,
            ..ApiConfig::default()
        };
        let path = vec![
            Address::repeat_byte(0x0A).to_string(),
            Address::repeat_byte(0x0B).to_string(),
        ];
        let req =
            percentage_request(&config, Some(60), None, Some(path.as_slice()), Some("5"), None, Some(30))
                .unwrap();
        assert_eq!(req.percentage, 60);
        assert_eq!(
            req.path,
            Some(vec![Address::repeat_byte(0x0A), Address::repeat_byte(0x0B)])
        );
        assert_eq!(req.min_out, U256::from(5u64));
        assert_eq!(req.deadline_secs, Some(30));
    }

    #[test]
    fn test_claim_args_defaults_to_full_balance() {
        let args = claim_args(None, None, None, None).unwrap();
        assert_eq!(args, ClaimArgs::default());
        assert_eq!(describe(args.amount), "full pending balance");
        assert!(claim_args(Some("abc".to_string()), None, None, None).is_err());
    }
}

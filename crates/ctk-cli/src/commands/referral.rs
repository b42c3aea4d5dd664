use crate::commands::common::{CliResult, Context};
use crate::{print_error, print_success};
use colored::Colorize;
use ctk_client::queries;
use ctk_core::validation::parse_address;

/// Handle referral query subcommands.
pub async fn handle(action: crate::ReferralCommands, ctx: &Context) -> CliResult {
    let contracts = ctx.contracts()?;
    let referral = &contracts.referral;

    match action {
        crate::ReferralCommands::Pending { account } => {
            let account = ctx.account(account.as_deref())?;
            let pending = queries::pending(referral, account).await?;
            println!("{}", "Pending Referral".cyan().bold());
            println!("{}", "─".repeat(50));
            println!("  Account:   {}", account.to_string().yellow());
            println!("  Pending:   {}", pending.to_string().green());
        }
        crate::ReferralCommands::Snapshot { account } => {
            let account = ctx.account(account.as_deref())?;
            let snap =
                queries::referral_snapshot(referral, account, ctx.config.fee_manager_address)
                    .await?;
            println!("{}", "Referral Snapshot".cyan().bold());
            println!("{}", "─".repeat(60));
            println!("  Account:    {}", account.to_string().yellow());
            println!("  Pending:    {}", snap.pending.to_string().green());
            println!(
                "  Claimable:  {}",
                if snap.claimable {
                    "yes".green()
                } else {
                    "no".red()
                }
            );
            println!("  Tier:       {}", snap.tier);
            println!("  Volume:     {}", snap.volume);
            let upline = snap.upline();
            if upline.is_empty() {
                println!("  Upline:     {}", "none".dimmed());
            } else {
                for (level, addr) in upline.iter().enumerate() {
                    println!("  Level {}:    {}", level + 1, addr);
                }
            }
        }
        crate::ReferralCommands::Leftover { model_id } => {
            let (label, value) = match model_id {
                Some(id) => (
                    format!("Model {} leftover", id),
                    queries::model_leftover(referral, id).await?,
                ),
                None => (
                    "Global leftover".to_string(),
                    queries::global_leftover(referral).await?,
                ),
            };
            println!("  {}: {}", label.bold(), value.to_string().green());
        }
        crate::ReferralCommands::Model { id } => {
            let model = queries::referral_model(referral, id).await?;
            println!("{}", format!("Referral Model {}", id).cyan().bold());
            println!("{}", "─".repeat(50));
            println!(
                "  Active:    {}",
                if model.active {
                    "yes".green()
                } else {
                    "no".red()
                }
            );
            println!("  Locked:    {}", model.locked);
            println!("  Levels:    {}", model.levels);
            let bps: Vec<String> = model.level_bps.iter().map(|b| b.to_string()).collect();
            println!("  Level bps: [{}] (total {})", bps.join(", "), model.total_bps());
        }
        crate::ReferralCommands::Pool => {
            let pool = queries::platform_pool(&contracts.core).await?;
            println!("  {}: {}", "Platform pool".bold(), pool.to_string().green());
        }
        crate::ReferralCommands::Total => {
            let total = queries::total_pending(referral).await?;
            println!("  {}: {}", "Total pending".bold(), total.to_string().green());
        }
        crate::ReferralCommands::Whitelisted { token } => {
            let token = parse_address(&token)?;
            if queries::is_token_whitelisted(referral, token).await? {
                print_success(&format!("{} is whitelisted for claims", token));
            } else {
                print_error(&format!("{} is not whitelisted for claims", token));
            }
        }
    }

    Ok(())
}

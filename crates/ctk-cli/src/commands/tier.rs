use crate::commands::common::{amount, CliResult, Context};
use crate::{print_info, print_success};
use colored::Colorize;
use ctk_core::{apply_slippage, determine_requested_tier, parse_tier_rules, TierRule};

/// Resolve a requested tier; `--rules` replaces the configured table, and
/// the configuration is only loaded without it.
pub fn tier<F>(volume: &str, rules: Option<&str>, load: F) -> CliResult
where
    F: FnOnce() -> Result<Context, Box<dyn std::error::Error>>,
{
    let table = rule_table(rules, load)?;
    if table.is_empty() {
        print_info("No tier rules configured; every volume resolves to tier 0");
    }
    let tier = determine_requested_tier(volume, &table)?;

    println!("{}", "Tier Resolution".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  Volume:   {}", volume.white());
    for rule in &table {
        let marker = if rule.tier == tier && tier != 0 { "←".green() } else { "".normal() };
        println!("  tier {:>3}  from {} {}", rule.tier, rule.min_volume, marker);
    }
    print_success(&format!("Requested tier: {}", tier));
    Ok(())
}

fn rule_table<F>(
    rules: Option<&str>,
    load: F,
) -> Result<Vec<TierRule>, Box<dyn std::error::Error>>
where
    F: FnOnce() -> Result<Context, Box<dyn std::error::Error>>,
{
    Ok(match rules {
        Some(raw) => parse_tier_rules(Some(raw)),
        None => load()?.config.tier_rules(),
    })
}

/// Minimum output for a quoted amount at the given tolerance.
pub fn slippage(amount_out: &str, bps: u32) -> CliResult {
    let quoted = amount(amount_out)?;
    let min_out = apply_slippage(quoted, bps)?;
    println!("  {:<14} {}", "Quoted Out:".bold(), quoted);
    println!("  {:<14} {} bps", "Tolerance:".bold(), bps);
    print_success(&format!("Min out: {}", min_out.to_string().green()));
    Ok(())
}

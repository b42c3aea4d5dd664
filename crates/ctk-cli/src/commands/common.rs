use crate::{print_info, print_success, ConfigCommands};
use colored::Colorize;
use ctk_client::{Contracts, GatewayAccount, Signer};
use ctk_core::math::parse_amount;
use ctk_core::validation::parse_address;
use ctk_core::{Address, ApiConfig, Error, Receipt, U256};
use std::path::PathBuf;
use std::sync::Arc;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Resolved configuration plus the signing identity, shared by every
/// remote subcommand. Contracts are connected per command from it.
pub struct Context {
    pub config: ApiConfig,
    config_path: Option<PathBuf>,
    signer: Option<Arc<dyn Signer>>,
}

impl Context {
    /// Config file, then environment, then command-line flags.
    pub fn load(
        rpc: Option<String>,
        config_path: Option<PathBuf>,
        signer: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = ApiConfig::load(config_path.as_deref())?;
        if let Some(rpc) = rpc {
            config.rpc_url = Some(rpc);
        }
        if let Some(raw) = signer {
            config.signer_address = Some(parse_address(&raw)?);
        }
        log::debug!(
            "config loaded: network={} rpc={:?} signer={:?}",
            config.network,
            config.rpc_url,
            config.signer_address
        );
        Ok(Self::from_config(config, config_path))
    }

    pub fn from_config(config: ApiConfig, config_path: Option<PathBuf>) -> Self {
        let signer = config
            .signer_address
            .map(|addr| Arc::new(GatewayAccount::new(addr)) as Arc<dyn Signer>);
        Self {
            config,
            config_path,
            signer,
        }
    }

    pub fn contracts(&self) -> ctk_core::Result<Contracts> {
        Contracts::connect(&self.config, self.signer.clone())
    }

    /// Explicit account, else the signer identity.
    pub fn account(&self, raw: Option<&str>) -> ctk_core::Result<Address> {
        match raw {
            Some(raw) => parse_address(raw),
            None => self.config.signer_address.ok_or_else(|| {
                Error::missing("no account given and no --signer / SIGNER_ADDRESS set")
            }),
        }
    }

    fn save_path(&self) -> ctk_core::Result<PathBuf> {
        self.config_path
            .clone()
            .or_else(ApiConfig::default_path)
            .ok_or_else(|| Error::Config("cannot resolve home directory".to_string()))
    }
}

pub fn amount(raw: &str) -> ctk_core::Result<U256> {
    parse_amount(raw)
}

pub fn opt_amount(raw: Option<&str>) -> ctk_core::Result<Option<U256>> {
    raw.map(parse_amount).transpose()
}

pub fn opt_address(raw: Option<&str>) -> ctk_core::Result<Option<Address>> {
    raw.map(parse_address).transpose()
}

pub fn addresses(raw: &[String]) -> ctk_core::Result<Vec<Address>> {
    raw.iter().map(|s| parse_address(s)).collect()
}

pub fn print_receipt(label: &str, receipt: &Receipt) {
    println!();
    print_success(label);
    println!("  {}: {}", "Tx Hash".bold(), receipt.tx_hash.green());
    if let Some(block) = receipt.block_number {
        println!("  {}: {}", "Block".bold(), block);
    }
    if let Some(gas) = receipt.gas_used {
        println!("  {}: {}", "Gas Used".bold(), gas);
    }
    println!();
}

fn show_address(label: &str, value: Option<Address>) {
    match value {
        Some(addr) => println!("  {:<18} {}", label.bold(), addr.to_string().green()),
        None => println!("  {:<18} {}", label.bold(), "(unset)".dimmed()),
    }
}

pub fn handle_config(action: ConfigCommands, ctx: &Context) -> CliResult {
    match action {
        ConfigCommands::Show => {
            let cfg = &ctx.config;
            println!("{}", "Effective Configuration".cyan().bold());
            println!("{}", "─".repeat(60));
            println!("  {:<18} {}", "Network".bold(), cfg.network);
            println!(
                "  {:<18} {}",
                "RPC".bold(),
                cfg.rpc_url.as_deref().unwrap_or("(unset)")
            );
            show_address("Core", cfg.core_address);
            show_address("Referral", cfg.referral_address);
            show_address("Fee Manager", cfg.fee_manager_address);
            show_address("wNative", cfg.w_native);
            show_address("Router", cfg.router);
            show_address("CTK Token", cfg.ctk_token);
            show_address("Referrer", cfg.referrer);
            show_address("Signer", cfg.signer_address);
            show_address("Claim Token Out", cfg.claim_token_out);
            println!("  {:<18} {}", "Claim Percent".bold(), cfg.claim_percent);
            println!("  {:<18} {}", "Tier Rules".bold(), cfg.tier_rules().len());
        }
        ConfigCommands::Save => {
            let path = ctx.save_path()?;
            ctx.config.save_to_file(&path)?;
            print_info(&format!("Configuration written to {}", path.display()));
        }
    }
    Ok(())
}

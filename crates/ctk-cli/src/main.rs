// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// C-TRACKER CLI - Swaps, Referral Queries & Claims against CoreSwap V4
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ctk-cli")]
#[command(about = "C-Tracker CLI - CoreSwap & ReferralEngine client", long_about = None)]
#[command(version)]
struct Cli {
    /// Gateway endpoint URL (reads RPC_URL env var, falls back to the config file)
    #[arg(short, long, env = "RPC_URL")]
    rpc: Option<String>,

    /// Config file (default: ~/.ctk/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account the gateway signs for (reads SIGNER_ADDRESS env var)
    #[arg(short, long, env = "SIGNER_ADDRESS")]
    signer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Best-path quote from CoreSwap
    Quote {
        /// Input amount (smallest unit)
        #[arg(long)]
        amount_in: String,

        /// Input token address
        #[arg(long)]
        token_in: String,

        /// Output token address
        #[arg(long)]
        token_out: String,
    },

    /// Fee-aware output estimates
    Estimate {
        #[command(subcommand)]
        action: EstimateCommands,
    },

    /// Swap operations
    Swap {
        #[command(subcommand)]
        action: SwapCommands,
    },

    /// Referral engine queries
    Referral {
        #[command(subcommand)]
        action: ReferralCommands,
    },

    /// Referral claims
    Claim {
        #[command(subcommand)]
        action: ClaimCommands,
    },

    /// Resolve a fee tier from accumulated volume
    Tier {
        /// Accumulated volume
        #[arg(long)]
        volume: String,

        /// Tier rules as JSON (default: TIER_RULES_JSON / config)
        #[arg(long)]
        rules: Option<String>,
    },

    /// Minimum output after slippage
    Slippage {
        /// Quoted output amount
        #[arg(long)]
        amount_out: String,

        /// Slippage tolerance in basis points (0-10000)
        #[arg(long)]
        bps: u32,
    },

    /// Effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Options shared by the single-referrer swap variants.
#[derive(Args, Debug, Clone, Default)]
struct SwapArgs {
    /// Slippage tolerance in bps (default 800)
    #[arg(long)]
    slippage_bps: Option<u32>,

    /// Explicit minimum output; wins over --expected-out and quotes
    #[arg(long)]
    min_out: Option<String>,

    /// Expected output; slippage is applied to it
    #[arg(long)]
    expected_out: Option<String>,

    /// Deadline window in seconds (default 600)
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Referral model id
    #[arg(long, default_value = "0")]
    model_id: u64,

    /// Level-1 referrer (default: REFERRER / config)
    #[arg(long)]
    referrer: Option<String>,

    /// Requested fee tier (default: configured tier rules applied to --volume
    /// or the signer's referral volume)
    #[arg(long)]
    requested_tier: Option<u8>,

    /// Accumulated volume the tier rules are applied to
    #[arg(long)]
    volume: Option<String>,

    /// Output recipient (default: caller)
    #[arg(long)]
    recipient: Option<String>,
}

#[derive(Subcommand)]
enum SwapCommands {
    /// Native → token
    Buy {
        #[arg(long)]
        token_out: String,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        opts: SwapArgs,
    },

    /// Token → native
    Sell {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        opts: SwapArgs,
    },

    /// Token → token
    Token {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        token_out: String,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        opts: SwapArgs,
    },

    /// Native → token along an explicit path (comma separated)
    BuyPath {
        #[arg(long, value_delimiter = ',', required = true)]
        path: Vec<String>,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        opts: SwapArgs,
    },

    /// Token → token along an explicit path (comma separated)
    TokenPath {
        #[arg(long, value_delimiter = ',', required = true)]
        path: Vec<String>,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        opts: SwapArgs,
    },

    /// Native → token with an explicit L1,L2,L3 referral chain
    BuyChain {
        #[arg(long)]
        token_out: String,

        #[arg(long)]
        amount_in: String,

        /// Exactly three addresses; use the zero address for unused levels
        #[arg(long, value_delimiter = ',', required = true)]
        ref_chain: Vec<String>,

        #[arg(long, default_value = "2")]
        model_id: u64,

        /// Requested fee tier (default: resolved from tier rules)
        #[arg(long)]
        requested_tier: Option<u8>,

        /// Accumulated volume the tier rules are applied to
        #[arg(long)]
        volume: Option<String>,

        #[arg(long)]
        recipient: Option<String>,

        #[arg(long)]
        slippage_bps: Option<u32>,

        #[arg(long)]
        min_out: Option<String>,

        #[arg(long)]
        expected_out: Option<String>,

        #[arg(long)]
        deadline_secs: Option<u64>,
    },
}

#[derive(Subcommand)]
enum EstimateCommands {
    /// Native → token
    Buy {
        #[arg(long)]
        token_out: String,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        fees: EstimateArgs,
    },

    /// Token → native
    Sell {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        fees: EstimateArgs,
    },

    /// Token → wNative → token
    Token {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        token_out: String,

        #[arg(long)]
        amount_in: String,

        #[command(flatten)]
        fees: EstimateArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct EstimateArgs {
    /// Account whose fee tier applies (default: signer)
    #[arg(long)]
    user: Option<String>,

    #[arg(long)]
    slippage_bps: Option<u32>,

    #[arg(long, default_value = "0")]
    model_id: u64,

    #[arg(long)]
    referrer: Option<String>,
}

#[derive(Subcommand)]
enum ReferralCommands {
    /// Pending referral balance
    Pending {
        /// Account (default: signer)
        account: Option<String>,
    },

    /// Full referral snapshot
    Snapshot {
        /// Account (default: signer)
        account: Option<String>,
    },

    /// Unassigned referral fees, global or per model
    Leftover {
        #[arg(long)]
        model_id: Option<u64>,
    },

    /// Referral model definition
    Model {
        /// Model id
        id: u64,
    },

    /// Total pending across all accounts
    Total,

    /// Platform fees accumulated in CoreSwap
    Pool,

    /// Whether a claim output token is whitelisted
    Whitelisted {
        /// Token address
        token: String,
    },
}

#[derive(Subcommand)]
enum ClaimCommands {
    /// Claim in native currency
    Native {
        /// Amount (default 0 = full pending)
        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        recipient: Option<String>,
    },

    /// Claim converted to a whitelisted token
    Token {
        /// Output token (default: CLAIM_TOKEN_OUT / config)
        #[arg(long)]
        token_out: Option<String>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        min_out: Option<String>,

        #[arg(long)]
        recipient: Option<String>,

        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// Claim along an explicit path starting at wNative
    Path {
        #[arg(long, value_delimiter = ',', required = true)]
        path: Vec<String>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        min_out: Option<String>,

        #[arg(long)]
        recipient: Option<String>,

        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// Claim a percentage of the pending balance
    Percent {
        /// 1-100 (default: CLAIM_PERCENT / config)
        #[arg(long)]
        percent: Option<u32>,

        /// Output token (default: CLAIM_TOKEN_OUT / config)
        #[arg(long)]
        token_out: Option<String>,

        /// Explicit route; wins over --token-out
        #[arg(long, value_delimiter = ',')]
        path: Option<Vec<String>>,

        #[arg(long)]
        min_out: Option<String>,

        #[arg(long)]
        recipient: Option<String>,

        #[arg(long)]
        deadline_secs: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the effective configuration to the config file
    Save,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        rpc,
        config,
        signer,
        command,
    } = Cli::parse();

    init_logging();
    print_banner();

    // Local commands never need the configuration file.
    let load = move || commands::common::Context::load(rpc, config, signer);

    match command {
        Commands::Quote {
            amount_in,
            token_in,
            token_out,
        } => commands::quote::best(&load()?, &amount_in, &token_in, &token_out).await?,
        Commands::Estimate { action } => commands::quote::handle(action, &load()?).await?,
        Commands::Swap { action } => commands::swap::handle(action, &load()?).await?,
        Commands::Referral { action } => commands::referral::handle(action, &load()?).await?,
        Commands::Claim { action } => commands::claim::handle(action, &load()?).await?,
        Commands::Tier { volume, rules } => commands::tier::tier(&volume, rules.as_deref(), load)?,
        Commands::Slippage { amount_out, bps } => commands::tier::slippage(&amount_out, bps)?,
        Commands::Config { action } => commands::common::handle_config(action, &load()?)?,
    }

    Ok(())
}

/// `RUST_LOG` controls verbosity; library `log` records are bridged in.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .try_init();
}

fn print_banner() {
    println!(
        "{}",
        "╔═══════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║      C-TRACKER (CTK) - CLI v1.1.0             ║"
            .cyan()
            .bold()
    );
    println!(
        "{}",
        "║   CoreSwap V4 | ReferralEngine V4             ║".cyan()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════╝".cyan()
    );
    println!();
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

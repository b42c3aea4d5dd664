use crate::error::{Error, Result};
use crate::tier::{parse_tier_rules, TierRule};
use crate::validation::parse_address;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Entries whose absence is logged once the file and environment are merged.
/// Operations that need them fail individually later.
pub const REQUIRED_ENV: [&str; 4] = ["CORE_V4", "REFERRAL_V4", "WNATIVE_V4", "RPC_URL"];

/// Client configuration: network, contract addresses and claim defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub network: String,
    pub rpc_url: Option<String>,
    pub core_address: Option<Address>,
    pub referral_address: Option<Address>,
    pub fee_manager_address: Option<Address>,
    pub w_native: Option<Address>,
    pub router: Option<Address>,
    pub ctk_token: Option<Address>,
    pub referrer: Option<Address>,
    pub signer_address: Option<Address>,
    pub claim_percent: u32,
    pub claim_token_out: Option<Address>,
    pub tier_rules_json: Option<String>,
}

impl ApiConfig {
    pub const DEFAULT_NETWORK: &'static str = "bscTestnet";

    /// Load from process environment. Never fails: unparsable addresses are
    /// logged and left unset.
    pub fn load_from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source (environment, test fixtures).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let addr = |key: &str| {
            get(key).and_then(|raw| match parse_address(&raw) {
                Ok(a) => Some(a),
                Err(_) => {
                    log::warn!("[ctk/config] {} is not an address: {}", key, raw);
                    None
                }
            })
        };

        let claim_percent = match get("CLAIM_PERCENT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("[ctk/config] CLAIM_PERCENT is not an integer: {}", raw);
                0
            }),
            None => 0,
        };

        Self {
            network: get("NETWORK").unwrap_or_else(|| Self::DEFAULT_NETWORK.to_string()),
            rpc_url: get("RPC_URL"),
            core_address: addr("CORE_V4"),
            referral_address: addr("REFERRAL_V4"),
            fee_manager_address: addr("FEE_V4"),
            w_native: addr("WNATIVE_V4"),
            router: addr("ROUTER_TESTNET").or_else(|| addr("ROUTER_MAINNET")),
            ctk_token: addr("CTK_TOKEN"),
            referrer: addr("REFERRER"),
            signer_address: addr("SIGNER_ADDRESS"),
            claim_percent,
            claim_token_out: addr("CLAIM_TOKEN_OUT"),
            tier_rules_json: get("TIER_RULES_JSON"),
        }
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config: ApiConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid TOML in {}: {}", path.display(), e)))?;
        if config.network.is_empty() {
            config.network = Self::DEFAULT_NETWORK.to_string();
        }
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Config(e.to_string()))?;
        }
        fs::write(path, content)
            .map_err(|e| Error::Config(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Values set in `overrides` win over `self`.
    pub fn merge(self, overrides: ApiConfig) -> Self {
        Self {
            // The env loader always fills the default network, so only a
            // non-default value counts as an override.
            network: if overrides.network.is_empty() || overrides.network == Self::DEFAULT_NETWORK {
                self.network
            } else {
                overrides.network
            },
            rpc_url: overrides.rpc_url.or(self.rpc_url),
            core_address: overrides.core_address.or(self.core_address),
            referral_address: overrides.referral_address.or(self.referral_address),
            fee_manager_address: overrides.fee_manager_address.or(self.fee_manager_address),
            w_native: overrides.w_native.or(self.w_native),
            router: overrides.router.or(self.router),
            ctk_token: overrides.ctk_token.or(self.ctk_token),
            referrer: overrides.referrer.or(self.referrer),
            signer_address: overrides.signer_address.or(self.signer_address),
            claim_percent: if overrides.claim_percent != 0 {
                overrides.claim_percent
            } else {
                self.claim_percent
            },
            claim_token_out: overrides.claim_token_out.or(self.claim_token_out),
            tier_rules_json: overrides.tier_rules_json.or(self.tier_rules_json),
        }
    }

    /// File values (when the file exists) overridden by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env = Self::load_from_env();
        let default_path = Self::default_path();
        let path = path.map(Path::to_path_buf).or(default_path);
        let config = match path {
            Some(p) if p.exists() => Self::load_from_file(&p)?.merge(env),
            _ => env,
        };
        for key in config.missing_required() {
            log::warn!("[ctk/config] missing {}", key);
        }
        Ok(config)
    }

    /// Names from [`REQUIRED_ENV`] with no value in this configuration.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = [
            self.core_address.is_some(),
            self.referral_address.is_some(),
            self.w_native.is_some(),
            self.rpc_url.is_some(),
        ];
        REQUIRED_ENV
            .into_iter()
            .zip(present)
            .filter_map(|(key, set)| (!set).then_some(key))
            .collect()
    }

    /// `~/.ctk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ctk").join("config.toml"))
    }

    pub fn tier_rules(&self) -> Vec<TierRule> {
        parse_tier_rules(self.tier_rules_json.as_deref())
    }

    pub fn require_rpc(&self) -> Result<&str> {
        self.rpc_url
            .as_deref()
            .ok_or_else(|| Error::missing("RPC_URL not configured"))
    }

    pub fn require_core(&self) -> Result<Address> {
        self.core_address
            .ok_or_else(|| Error::missing("CORE_V4 (core contract address) not configured"))
    }

    pub fn require_referral(&self) -> Result<Address> {
        self.referral_address
            .ok_or_else(|| Error::missing("REFERRAL_V4 (referral contract address) not configured"))
    }

    pub fn require_w_native(&self) -> Result<Address> {
        self.w_native
            .ok_or_else(|| Error::missing("WNATIVE_V4 (wrapped native address) not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CORE: &str = "0xfF2B8a49Df43ed103B67f6F8E72F049aD8f330Ba";
    const REFERRAL: &str = "0x2222222222222222222222222222222222222222";
    const WBNB: &str = "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_full() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("NETWORK", "bsc"),
            ("RPC_URL", "http://localhost:8545"),
            ("CORE_V4", CORE),
            ("REFERRAL_V4", REFERRAL),
            ("WNATIVE_V4", WBNB),
            ("CLAIM_PERCENT", "50"),
            ("TIER_RULES_JSON", r#"[{"minVolume":"0","tier":0},{"minVolume":"10","tier":1}]"#),
        ]));
        assert_eq!(cfg.network, "bsc");
        assert_eq!(cfg.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(cfg.core_address, Some(parse_address(CORE).unwrap()));
        assert_eq!(cfg.claim_percent, 50);
        assert_eq!(cfg.tier_rules().len(), 2);
        assert!(cfg.require_w_native().is_ok());
    }

    #[test]
    fn test_missing_required_is_not_fatal() {
        let cfg = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.network, ApiConfig::DEFAULT_NETWORK);
        assert!(cfg.core_address.is_none());
        assert!(cfg.require_core().unwrap_err().is_missing_context());
        assert!(cfg.require_referral().unwrap_err().is_missing_context());
        assert!(cfg.require_rpc().unwrap_err().is_missing_context());
        assert_eq!(cfg.claim_percent, 0);
        assert!(cfg.tier_rules().is_empty());
    }

    #[test]
    fn test_file_values_satisfy_required_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        ApiConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://localhost:8545"),
            ("CORE_V4", CORE),
            ("REFERRAL_V4", REFERRAL),
            ("WNATIVE_V4", WBNB),
        ]))
        .save_to_file(&path)
        .unwrap();

        let env = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(env.missing_required(), REQUIRED_ENV.to_vec());

        let merged = ApiConfig::load_from_file(&path).unwrap().merge(env);
        assert!(merged.missing_required().is_empty());

        let partial = ApiConfig::from_lookup(lookup(&[("RPC_URL", "http://localhost:8545")]));
        assert_eq!(partial.missing_required(), vec!["CORE_V4", "REFERRAL_V4", "WNATIVE_V4"]);
    }

    #[test]
    fn test_bad_address_treated_as_absent() {
        let cfg = ApiConfig::from_lookup(lookup(&[("CORE_V4", "core-v4"), ("CLAIM_PERCENT", "half")]));
        assert!(cfg.core_address.is_none());
        assert_eq!(cfg.claim_percent, 0);
    }

    #[test]
    fn test_router_falls_back_to_mainnet() {
        let cfg = ApiConfig::from_lookup(lookup(&[("ROUTER_MAINNET", REFERRAL)]));
        assert_eq!(cfg.router, Some(parse_address(REFERRAL).unwrap()));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://localhost:8545"),
            ("CORE_V4", CORE),
            ("REFERRAL_V4", REFERRAL),
            ("CLAIM_PERCENT", "25"),
        ]));
        cfg.save_to_file(&path).unwrap();
        let loaded = ApiConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "core_address = [").unwrap();
        assert!(matches!(
            ApiConfig::load_from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_merge_env_overrides_file() {
        let file = ApiConfig::from_lookup(lookup(&[
            ("NETWORK", "bsc"),
            ("CORE_V4", CORE),
            ("CLAIM_PERCENT", "25"),
        ]));
        let env = ApiConfig::from_lookup(lookup(&[("CORE_V4", REFERRAL), ("WNATIVE_V4", WBNB)]));
        let merged = file.merge(env);
        assert_eq!(merged.network, "bsc");
        assert_eq!(merged.core_address, Some(parse_address(REFERRAL).unwrap()));
        assert_eq!(merged.w_native, Some(parse_address(WBNB).unwrap()));
        assert_eq!(merged.claim_percent, 25);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REMOTE COLLABORATORS - CoreSwap, ReferralEngine, FeeManager
//
// Every call-assembly function takes one of these handles explicitly.
// Nothing here is global or cached.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::calls::{ClaimCall, SwapCall};
use crate::gateway::HttpGateway;
use crate::signer::Signer;
use async_trait::async_trait;
use ctk_core::{
    Address, ApiConfig, FeeConfig, Quote, Receipt, ReferralModel, ReferralSnapshot, Result, U256,
};
use std::sync::Arc;

/// CoreSwap: quoting and swap submission.
#[cfg_attr(any(test, feature = "automock"), mockall::automock)]
#[async_trait]
pub trait SwapCore: Send + Sync {
    async fn quote_best_path(
        &self,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> Result<Quote>;

    /// Submit one swap and wait for its receipt.
    async fn submit(&self, call: SwapCall) -> Result<Receipt>;

    async fn platform_pool(&self) -> Result<U256>;
}

/// ReferralEngine: pending balances, models, and claims.
#[cfg_attr(any(test, feature = "automock"), mockall::automock)]
#[async_trait]
pub trait ReferralLedger: Send + Sync {
    async fn pending_referral(&self, account: Address) -> Result<U256>;

    async fn total_pending_referral(&self) -> Result<U256>;

    /// `fee_manager` is the zero address when none is configured.
    async fn referral_snapshot(
        &self,
        account: Address,
        fee_manager: Address,
    ) -> Result<ReferralSnapshot>;

    async fn referral_model(&self, id: u64) -> Result<ReferralModel>;

    async fn is_token_whitelisted(&self, token: Address) -> Result<bool>;

    async fn leftover_referral(&self) -> Result<U256>;

    async fn model_leftover(&self, model_id: u64) -> Result<U256>;

    /// Wrapped native token the engine swaps claims from.
    async fn w_native(&self) -> Result<Address>;

    /// Submit one claim and wait for its receipt.
    async fn submit_claim(&self, call: ClaimCall) -> Result<Receipt>;

    /// Identity of the attached signer, if any.
    fn signer_address(&self) -> Option<Address>;
}

/// FeeManager: tier lookups and the platform fee table.
#[cfg_attr(any(test, feature = "automock"), mockall::automock)]
#[async_trait]
pub trait FeeManager: Send + Sync {
    async fn current_tier(&self, account: Address) -> Result<u8>;

    async fn fee_config(&self) -> Result<FeeConfig>;
}

/// Gateways for one deployment, built from configuration.
#[derive(Debug)]
pub struct Contracts {
    pub core: HttpGateway,
    pub referral: HttpGateway,
    pub fee_manager: Option<HttpGateway>,
    pub w_native: Option<Address>,
}

impl Contracts {
    /// Requires the RPC endpoint plus the core and referral addresses; the
    /// fee manager and wNative stay optional.
    pub fn connect(config: &ApiConfig, signer: Option<Arc<dyn Signer>>) -> Result<Self> {
        let rpc = config.require_rpc()?;
        let attach = |gateway: HttpGateway| match &signer {
            Some(s) => gateway.with_signer(Arc::clone(s)),
            None => gateway,
        };

        let core = attach(HttpGateway::new(rpc, config.require_core()?));
        let referral = attach(HttpGateway::new(rpc, config.require_referral()?));
        let fee_manager = config
            .fee_manager_address
            .map(|addr| attach(HttpGateway::new(rpc, addr)));

        log::debug!(
            "contracts connected: core={} referral={} fee_manager={:?}",
            core.contract(),
            referral.contract(),
            fee_manager.as_ref().map(|g| g.contract())
        );

        Ok(Self {
            core,
            referral,
            fee_manager,
            w_native: config.w_native,
        })
    }

    pub fn fee_manager(&self) -> Option<&dyn FeeManager> {
        self.fee_manager.as_ref().map(|g| g as &dyn FeeManager)
    }

    /// Configured wNative, else the referral engine's.
    pub async fn resolve_w_native(&self) -> Option<Address> {
        crate::queries::resolve_w_native(self.w_native, &self.referral).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ApiConfig {
        ApiConfig {
            rpc_url: Some("http://127.0.0.1:3030/".to_string()),
            core_address: Some(Address::repeat_byte(0x01)),
            referral_address: Some(Address::repeat_byte(0x02)),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_connect_requires_rpc_and_addresses() {
        let mut cfg = base_config();
        cfg.rpc_url = None;
        assert!(Contracts::connect(&cfg, None).unwrap_err().is_missing_context());

        let mut cfg = base_config();
        cfg.referral_address = None;
        assert!(Contracts::connect(&cfg, None).unwrap_err().is_missing_context());
    }

    #[test]
    fn test_connect_optional_fee_manager() {
        let contracts = Contracts::connect(&base_config(), None).unwrap();
        assert_eq!(contracts.core.contract(), Address::repeat_byte(0x01));
        assert!(contracts.fee_manager().is_none());
        assert_eq!(contracts.w_native, None);

        let mut cfg = base_config();
        cfg.fee_manager_address = Some(Address::repeat_byte(0x03));
        cfg.w_native = Some(Address::repeat_byte(0x04));
        let contracts = Contracts::connect(&cfg, None).unwrap();
        assert!(contracts.fee_manager().is_some());
        assert_eq!(contracts.w_native, Some(Address::repeat_byte(0x04)));
    }

    #[tokio::test]
    async fn test_configured_w_native_needs_no_lookup() {
        let mut cfg = base_config();
        cfg.w_native = Some(Address::repeat_byte(0x04));
        let contracts = Contracts::connect(&cfg, None).unwrap();
        assert_eq!(
            contracts.resolve_w_native().await,
            Some(Address::repeat_byte(0x04))
        );
    }

    #[test]
    fn test_connect_attaches_signer_identity() {
        let signer: Arc<dyn Signer> = Arc::new(crate::signer::GatewayAccount::new(
            Address::repeat_byte(0x55),
        ));
        let contracts = Contracts::connect(&base_config(), Some(signer)).unwrap();
        assert_eq!(
            contracts.referral.signer_address(),
            Some(Address::repeat_byte(0x55))
        );
    }
}

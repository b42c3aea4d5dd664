// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP CONTRACT GATEWAY - JSON node API over reqwest
//
// Read-only:      POST {rpc}/query-contract
// State-changing: POST {rpc}/call-contract  (waits for the receipt)
// Both answer {"status":"success", ...} or {"status":"error","msg":...}.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::calls::{ClaimCall, SwapCall};
use crate::codec::{
    address_arg, decode_address, decode_bool, decode_fee_config, decode_quote, decode_receipt,
    decode_referral_model, decode_snapshot, decode_u256, decode_u8, u256_arg, u64_arg,
};
use crate::contracts::{FeeManager, ReferralLedger, SwapCore};
use crate::signer::{keccak256, Signer};
use async_trait::async_trait;
use ctk_core::math::now_secs;
use ctk_core::{
    Address, Error, FeeConfig, Quote, Receipt, ReferralModel, ReferralSnapshot, Result, U256,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// One deployed contract behind a gateway node.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    rpc: String,
    contract: Address,
    signer: Option<Arc<dyn Signer>>,
}

impl HttpGateway {
    pub fn new(rpc: &str, contract: Address) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc: rpc.trim_end_matches('/').to_string(),
            contract,
            signer: None,
        }
    }

    /// Attach the identity that authorizes state-changing calls.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn rpc(&self) -> &str {
        &self.rpc
    }

    async fn post(&self, endpoint: &str, operation: &str, payload: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.rpc, endpoint);
        let resp = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::remote(operation, e.to_string()))?;
        let http_status = resp.status();
        let data: Value = resp
            .json()
            .await
            .map_err(|e| Error::remote(operation, format!("HTTP {}: {}", http_status, e)))?;

        if data["status"].as_str() == Some("success") {
            Ok(data)
        } else {
            let msg = data["msg"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", http_status));
            Err(Error::remote(operation, msg))
        }
    }

    /// Read-only call; returns the `result` field.
    pub async fn query(&self, function: &str, args: Vec<Value>) -> Result<Value> {
        let payload = json!({
            "contract_address": address_arg(self.contract),
            "function": function,
            "args": args,
        });
        let data = self.post("query-contract", function, &payload).await?;
        Ok(data.get("result").cloned().unwrap_or(Value::Null))
    }

    /// State-changing call. Blocks until the gateway reports the receipt.
    pub async fn transact(&self, function: &str, args: Vec<Value>, value: U256) -> Result<Receipt> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            Error::missing(format!("`{}` needs a signer; none configured", function))
        })?;
        let caller = signer.address();
        let timestamp = now_secs();
        let digest = call_digest(self.contract, function, &args, value, caller, timestamp);
        let signature = signer.sign_digest(&digest)?;

        log::debug!(
            "[ctk/gateway] {}({}) value={} caller={}",
            function,
            Value::Array(args.clone()),
            value,
            caller
        );

        let payload = json!({
            "contract_address": address_arg(self.contract),
            "function": function,
            "args": args,
            "value": value.to_string(),
            "caller": address_arg(caller),
            "timestamp": timestamp,
            "digest": format!("0x{}", hex::encode(digest)),
            "signature": format!("0x{}", hex::encode(signature)),
            "wait_for_receipt": true,
        });
        let data = self.post("call-contract", function, &payload).await?;
        decode_receipt(&data, function)
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("rpc", &self.rpc)
            .field("contract", &self.contract)
            .field("signer", &self.signer.as_ref().map(|s| s.address()))
            .finish()
    }
}

/// Keccak-256 of the canonical (key-sorted) JSON of a call.
pub fn call_digest(
    contract: Address,
    function: &str,
    args: &[Value],
    value: U256,
    caller: Address,
    timestamp: u64,
) -> [u8; 32] {
    let canonical = json!({
        "contract_address": address_arg(contract),
        "function": function,
        "args": args,
        "value": value.to_string(),
        "caller": address_arg(caller),
        "timestamp": timestamp,
    });
    keccak256(canonical.to_string().as_bytes())
}

// ─────────────────────────────────────────────────────────────────
// COLLABORATOR IMPLEMENTATIONS
// ─────────────────────────────────────────────────────────────────

#[async_trait]
impl SwapCore for HttpGateway {
    async fn quote_best_path(
        &self,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> Result<Quote> {
        let result = self
            .query(
                "quoteBestPath",
                vec![
                    u256_arg(amount_in),
                    address_arg(token_in),
                    address_arg(token_out),
                ],
            )
            .await?;
        decode_quote(&result)
    }

    async fn submit(&self, call: SwapCall) -> Result<Receipt> {
        self.transact(call.function(), call.args(), call.value())
            .await
    }

    async fn platform_pool(&self) -> Result<U256> {
        let result = self.query("platformPool", Vec::new()).await?;
        decode_u256(&result, "platformPool")
    }
}

#[async_trait]
impl ReferralLedger for HttpGateway {
    async fn pending_referral(&self, account: Address) -> Result<U256> {
        let result = self
            .query("pendingReferral", vec![address_arg(account)])
            .await?;
        decode_u256(&result, "pendingReferral")
    }

    async fn total_pending_referral(&self) -> Result<U256> {
        let result = self.query("totalPendingReferral", Vec::new()).await?;
        decode_u256(&result, "totalPendingReferral")
    }

    async fn referral_snapshot(
        &self,
        account: Address,
        fee_manager: Address,
    ) -> Result<ReferralSnapshot> {
        let result = self
            .query(
                "referralUserSnapshot",
                vec![address_arg(account), address_arg(fee_manager)],
            )
            .await?;
        decode_snapshot(&result)
    }

    async fn referral_model(&self, id: u64) -> Result<ReferralModel> {
        let result = self.query("getReferralModel", vec![u64_arg(id)]).await?;
        decode_referral_model(&result)
    }

    async fn is_token_whitelisted(&self, token: Address) -> Result<bool> {
        let result = self
            .query("isTokenWhitelisted", vec![address_arg(token)])
            .await?;
        decode_bool(&result, "isTokenWhitelisted")
    }

    async fn leftover_referral(&self) -> Result<U256> {
        let result = self.query("leftoverReferral", Vec::new()).await?;
        decode_u256(&result, "leftoverReferral")
    }

    async fn model_leftover(&self, model_id: u64) -> Result<U256> {
        let result = self.query("modelLeftover", vec![u64_arg(model_id)]).await?;
        decode_u256(&result, "modelLeftover")
    }

    async fn w_native(&self) -> Result<Address> {
        let result = self.query("wNative", Vec::new()).await?;
        decode_address(&result, "wNative")
    }

    async fn submit_claim(&self, call: ClaimCall) -> Result<Receipt> {
        self.transact(call.function(), call.args(), U256::ZERO)
            .await
    }

    fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }
}

#[async_trait]
impl FeeManager for HttpGateway {
    async fn current_tier(&self, account: Address) -> Result<u8> {
        let result = self.query("currentTier", vec![address_arg(account)]).await?;
        decode_u8(&result, "currentTier")
    }

    async fn fee_config(&self) -> Result<FeeConfig> {
        let result = self.query("feeConfig", Vec::new()).await?;
        decode_fee_config(&result)
    }
}

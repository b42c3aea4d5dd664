// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REFERRAL CLAIMS
//
// Direct claims (native / token / path) and percentage claims planned
// against the pending balance. Claims are not idempotent: no retries.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::calls::ClaimCall;
use crate::contracts::ReferralLedger;
use ctk_core::validation::check_path;
use ctk_core::{
    calc_deadline, plan_claim, Address, ClaimDecision, ClaimOutcome, Error, Percentage, Receipt,
    Result, SettlementRequest, U256, DEFAULT_DEADLINE_SECS,
};

/// Amount, floor, recipient and deadline for a direct claim.
///
/// A zero `amount` claims the full pending balance; a zero `recipient`
/// pays the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClaimArgs {
    pub amount: U256,
    pub min_out: U256,
    pub recipient: Address,
    pub deadline_secs: Option<u64>,
}

impl ClaimArgs {
    fn deadline(&self) -> u64 {
        calc_deadline(self.deadline_secs.unwrap_or(DEFAULT_DEADLINE_SECS))
    }
}

/// Percentage claim request. `path` wins over `token_out` when both are set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimPercentage {
    pub percentage: u32,
    pub token_out: Option<Address>,
    pub path: Option<Vec<Address>>,
    pub min_out: U256,
    /// Whose balance is read and who gets paid. Zero falls back to the
    /// signer identity.
    pub recipient: Address,
    pub deadline_secs: Option<u64>,
}

async fn submit<L>(referral: &L, call: ClaimCall) -> Result<Receipt>
where
    L: ReferralLedger + ?Sized,
{
    let function = call.function();
    log::debug!("[ctk/claim] {} amount={}", function, call.amount());
    let receipt = referral.submit_claim(call).await?;
    log::info!("[ctk/claim] {} confirmed: {}", function, receipt.tx_hash);
    Ok(receipt)
}

/// Claim in native currency; the min-out floor is always zero.
pub async fn claim_native<L>(referral: &L, amount: U256, recipient: Address) -> Result<Receipt>
where
    L: ReferralLedger + ?Sized,
{
    let call = ClaimCall::Referral {
        amount,
        token_out: Address::ZERO,
        min_out: U256::ZERO,
        deadline: calc_deadline(DEFAULT_DEADLINE_SECS),
        recipient,
    };
    submit(referral, call).await
}

/// Claim converted to `token_out` through the engine's configured router.
pub async fn claim_token<L>(referral: &L, token_out: Address, args: &ClaimArgs) -> Result<Receipt>
where
    L: ReferralLedger + ?Sized,
{
    let call = ClaimCall::Referral {
        amount: args.amount,
        token_out,
        min_out: args.min_out,
        deadline: args.deadline(),
        recipient: args.recipient,
    };
    submit(referral, call).await
}

/// Claim along an explicit route; `path[0]` must be wNative on the engine side.
pub async fn claim_path<L>(referral: &L, path: &[Address], args: &ClaimArgs) -> Result<Receipt>
where
    L: ReferralLedger + ?Sized,
{
    check_path(path)?;
    let call = ClaimCall::ReferralPath {
        amount: args.amount,
        path: path.to_vec(),
        min_out: args.min_out,
        deadline: args.deadline(),
        recipient: args.recipient,
    };
    submit(referral, call).await
}

/// Read pending for the resolved account, plan a partial claim and issue it.
///
/// Pending and claim are two separate round-trips; the ledger settles any
/// change in between.
pub async fn claim_percentage<L>(referral: &L, req: &ClaimPercentage) -> Result<ClaimOutcome>
where
    L: ReferralLedger + ?Sized,
{
    let percentage = Percentage::new(req.percentage)?;
    let settlement = SettlementRequest {
        token_out: req.token_out,
        path: req.path.clone(),
    };
    settlement.select()?;

    let account = if !req.recipient.is_zero() {
        req.recipient
    } else {
        referral
            .signer_address()
            .ok_or_else(|| Error::missing("no recipient given and no signer attached"))?
    };

    let pending = referral.pending_referral(account).await?;
    match plan_claim(pending, percentage, &settlement, req.min_out, req.deadline_secs)? {
        ClaimDecision::Skip { reason } => {
            log::info!("[ctk/claim] {} skipped: {}", account, reason);
            Ok(ClaimOutcome::Skipped {
                reason: reason.to_string(),
            })
        }
        ClaimDecision::Claim(plan) => {
            log::info!(
                "[ctk/claim] {} claiming {} of {} pending ({}, {})",
                account,
                plan.amount,
                pending,
                percentage,
                plan.settlement.label()
            );
            let receipt = submit(referral, ClaimCall::from_plan(&plan, req.recipient)).await?;
            Ok(ClaimOutcome::Claimed { plan, receipt })
        }
    }
}

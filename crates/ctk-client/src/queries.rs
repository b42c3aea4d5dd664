use crate::contracts::{ReferralLedger, SwapCore};
use ctk_core::tier::{resolve_tier, TierRule};
use ctk_core::{Address, ReferralModel, ReferralSnapshot, Result, U256};

/// Snapshot of `account`; a missing fee manager is sent as the zero address.
pub async fn referral_snapshot<L>(
    referral: &L,
    account: Address,
    fee_manager: Option<Address>,
) -> Result<ReferralSnapshot>
where
    L: ReferralLedger + ?Sized,
{
    referral
        .referral_snapshot(account, fee_manager.unwrap_or(Address::ZERO))
        .await
}

pub async fn pending<L>(referral: &L, account: Address) -> Result<U256>
where
    L: ReferralLedger + ?Sized,
{
    referral.pending_referral(account).await
}

/// The snapshot's `claimable` flag.
pub async fn has_claimable<L>(
    referral: &L,
    account: Address,
    fee_manager: Option<Address>,
) -> Result<bool>
where
    L: ReferralLedger + ?Sized,
{
    Ok(referral_snapshot(referral, account, fee_manager)
        .await?
        .claimable)
}

/// Same figure as [`pending`]; the full amount a zero-amount claim pays.
pub async fn claimable_amount<L>(referral: &L, account: Address) -> Result<U256>
where
    L: ReferralLedger + ?Sized,
{
    pending(referral, account).await
}

/// Referral fees that found no beneficiary, across all models.
pub async fn global_leftover<L>(referral: &L) -> Result<U256>
where
    L: ReferralLedger + ?Sized,
{
    referral.leftover_referral().await
}

pub async fn model_leftover<L>(referral: &L, model_id: u64) -> Result<U256>
where
    L: ReferralLedger + ?Sized,
{
    referral.model_leftover(model_id).await
}

pub async fn total_pending<L>(referral: &L) -> Result<U256>
where
    L: ReferralLedger + ?Sized,
{
    referral.total_pending_referral().await
}

pub async fn referral_model<L>(referral: &L, model_id: u64) -> Result<ReferralModel>
where
    L: ReferralLedger + ?Sized,
{
    referral.referral_model(model_id).await
}

pub async fn is_token_whitelisted<L>(referral: &L, token: Address) -> Result<bool>
where
    L: ReferralLedger + ?Sized,
{
    referral.is_token_whitelisted(token).await
}

/// Tier the rule table grants `account` for the volume its snapshot reports.
/// An empty table resolves to 0 without a remote read.
pub async fn tier_for_account<L>(
    referral: &L,
    account: Address,
    fee_manager: Option<Address>,
    rules: &[TierRule],
) -> Result<u8>
where
    L: ReferralLedger + ?Sized,
{
    if rules.is_empty() {
        return Ok(0);
    }
    let snap = referral_snapshot(referral, account, fee_manager).await?;
    Ok(resolve_tier(snap.volume, rules))
}

/// Configured wNative, else the one the referral engine reports. A failed
/// lookup leaves it unknown.
pub async fn resolve_w_native<L>(configured: Option<Address>, referral: &L) -> Option<Address>
where
    L: ReferralLedger + ?Sized,
{
    if configured.is_some() {
        return configured;
    }
    match referral.w_native().await {
        Ok(addr) if !addr.is_zero() => Some(addr),
        Ok(_) => None,
        Err(e) => {
            log::warn!("wNative lookup failed: {}", e);
            None
        }
    }
}

/// Platform fees accumulated in CoreSwap.
pub async fn platform_pool<C>(core: &C) -> Result<U256>
where
    C: SwapCore + ?Sized,
{
    core.platform_pool().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{MockReferralLedger, MockSwapCore};
    use ctk_core::Error;
    use mockall::predicate::eq;

    fn snapshot(claimable: bool) -> ReferralSnapshot {
        ReferralSnapshot {
            claimable,
            pending: U256::from(77u64),
            level1: Address::repeat_byte(1),
            level2: Address::ZERO,
            level3: Address::ZERO,
            tier: 1,
            volume: U256::from(6_000u64),
        }
    }

    #[tokio::test]
    async fn test_snapshot_defaults_fee_manager_to_zero() {
        let mut referral = MockReferralLedger::new();
        referral
            .expect_referral_snapshot()
            .with(eq(Address::repeat_byte(9)), eq(Address::ZERO))
            .times(1)
            .returning(|_, _| Ok(snapshot(true)));

        assert!(has_claimable(&referral, Address::repeat_byte(9), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_snapshot_forwards_fee_manager() {
        let mut referral = MockReferralLedger::new();
        referral
            .expect_referral_snapshot()
            .with(eq(Address::repeat_byte(9)), eq(Address::repeat_byte(3)))
            .times(1)
            .returning(|_, _| Ok(snapshot(false)));

        let snap = referral_snapshot(
            &referral,
            Address::repeat_byte(9),
            Some(Address::repeat_byte(3)),
        )
        .await
        .unwrap();
        assert!(!snap.claimable);
        assert_eq!(snap.upline(), vec![Address::repeat_byte(1)]);
    }

    #[tokio::test]
    async fn test_claimable_amount_is_pending() {
        let mut referral = MockReferralLedger::new();
        referral
            .expect_pending_referral()
            .times(2)
            .returning(|_| Ok(U256::from(500u64)));
        let account = Address::repeat_byte(4);
        assert_eq!(
            claimable_amount(&referral, account).await.unwrap(),
            pending(&referral, account).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_leftovers() {
        let mut referral = MockReferralLedger::new();
        referral
            .expect_leftover_referral()
            .returning(|| Ok(U256::from(12u64)));
        referral
            .expect_model_leftover()
            .with(eq(2u64))
            .returning(|_| Ok(U256::from(5u64)));
        assert_eq!(global_leftover(&referral).await.unwrap(), U256::from(12u64));
        assert_eq!(model_leftover(&referral, 2).await.unwrap(), U256::from(5u64));
    }

    #[tokio::test]
    async fn test_tier_for_account_uses_snapshot_volume() {
        let mut referral = MockReferralLedger::new();
        referral
            .expect_referral_snapshot()
            .with(eq(Address::repeat_byte(9)), eq(Address::ZERO))
            .times(1)
            .returning(|_, _| Ok(snapshot(true)));
        let rules = [
            TierRule::new(U256::ZERO, 0),
            TierRule::new(U256::from(5_000u64), 1),
            TierRule::new(U256::from(10_000u64), 2),
        ];
        let tier = tier_for_account(&referral, Address::repeat_byte(9), None, &rules)
            .await
            .unwrap();
        assert_eq!(tier, 1);
    }

    #[tokio::test]
    async fn test_tier_for_account_empty_table_skips_lookup() {
        let mut referral = MockReferralLedger::new();
        referral.expect_referral_snapshot().times(0);
        let tier = tier_for_account(&referral, Address::repeat_byte(9), None, &[])
            .await
            .unwrap();
        assert_eq!(tier, 0);
    }

    #[tokio::test]
    async fn test_resolve_w_native_prefers_configured() {
        let mut referral = MockReferralLedger::new();
        referral.expect_w_native().times(0);
        let configured = Some(Address::repeat_byte(0xEE));
        assert_eq!(resolve_w_native(configured, &referral).await, configured);
    }

    #[tokio::test]
    async fn test_resolve_w_native_falls_back_to_engine() {
        let mut referral = MockReferralLedger::new();
        referral
            .expect_w_native()
            .times(1)
            .returning(|| Ok(Address::repeat_byte(0xEE)));
        assert_eq!(
            resolve_w_native(None, &referral).await,
            Some(Address::repeat_byte(0xEE))
        );

        let mut failing = MockReferralLedger::new();
        failing
            .expect_w_native()
            .returning(|| Err(Error::remote("wNative", "execution reverted")));
        assert_eq!(resolve_w_native(None, &failing).await, None);

        let mut unset = MockReferralLedger::new();
        unset.expect_w_native().returning(|| Ok(Address::ZERO));
        assert_eq!(resolve_w_native(None, &unset).await, None);
    }

    #[tokio::test]
    async fn test_platform_pool() {
        let mut core = MockSwapCore::new();
        core.expect_platform_pool()
            .times(1)
            .returning(|| Ok(U256::from(42u64)));
        assert_eq!(platform_pool(&core).await.unwrap(), U256::from(42u64));
    }
}

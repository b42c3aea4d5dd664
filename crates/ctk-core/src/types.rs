use crate::error::{Error, Result};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim percentage in (0, 100]. Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Percentage(u8);

impl Percentage {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 || value > 100 {
            return Err(Error::invalid(format!(
                "percentage must be in (0, 100], got {}",
                value
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Percentage {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Best-path quote returned by `quoteBestPath`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub router: Address,
    pub path: Vec<Address>,
    pub amount_out: U256,
}

/// Read-only view of an account's referral state at query time. May be
/// stale by the time a following claim executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralSnapshot {
    pub claimable: bool,
    pub pending: U256,
    pub level1: Address,
    pub level2: Address,
    pub level3: Address,
    pub tier: u8,
    pub volume: U256,
}

impl ReferralSnapshot {
    /// Upline levels that are set (non-zero), in order.
    pub fn upline(&self) -> Vec<Address> {
        [self.level1, self.level2, self.level3]
            .into_iter()
            .filter(|a| !a.is_zero())
            .collect()
    }
}

/// Referral model definition (`getReferralModel`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralModel {
    pub id: U256,
    pub level_bps: Vec<u16>,
    pub active: bool,
    pub levels: u8,
    pub locked: bool,
}

impl ReferralModel {
    pub fn total_bps(&self) -> u32 {
        self.level_bps.iter().map(|b| *b as u32).sum()
    }
}

/// Fee manager platform fee table (`feeConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeConfig {
    pub default_platform_bp: u16,
    pub vip_platform_bp: u16,
    pub premium_platform_bp: u16,
    pub max_referral_total_bp: u16,
}

impl FeeConfig {
    /// Platform fee for a tier: 2 = premium, 1 = VIP, anything else = default.
    pub fn platform_bps_for_tier(&self, tier: u8) -> u16 {
        match tier {
            2 => self.premium_platform_bp,
            1 => self.vip_platform_bp,
            _ => self.default_platform_bp,
        }
    }
}

/// How a claim payout is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    Native,
    Token(Address),
    Path(Vec<Address>),
}

impl Settlement {
    pub fn label(&self) -> &'static str {
        match self {
            Settlement::Native => "native",
            Settlement::Token(_) => "token",
            Settlement::Path(_) => "path",
        }
    }
}

/// A single claim, consumed exactly once by the call issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPlan {
    pub amount: U256,
    pub settlement: Settlement,
    pub min_out: U256,
    pub deadline: u64,
}

/// Finalized transaction receipt, normalized from the gateway response.
/// Reverted transactions never produce a receipt; they surface as
/// [`Error::RemoteCallFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
}

/// Result of a percentage claim request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed { plan: ClaimPlan, receipt: Receipt },
    Skipped { reason: String },
}

impl ClaimOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ClaimOutcome::Skipped { .. })
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            ClaimOutcome::Claimed { receipt, .. } => Some(receipt),
            ClaimOutcome::Skipped { .. } => None,
        }
    }
}

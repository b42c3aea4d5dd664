//! Pre-flight checks. Everything here runs before a remote call is attempted.

use crate::error::{Error, Result};
use crate::math::parse_amount;
use crate::REFERRAL_CHAIN_LEN;
use alloy_primitives::{Address, U256};
use std::str::FromStr;

/// Parse a 20-byte hex address (`0x` prefix optional, checksum not enforced).
pub fn parse_address(raw: &str) -> Result<Address> {
    Address::from_str(raw.trim())
        .map_err(|_| Error::invalid(format!("not an address: {:?}", raw)))
}

/// Explicit routes need at least a source and a destination.
pub fn check_path(path: &[Address]) -> Result<()> {
    if path.len() < 2 {
        return Err(Error::invalid(format!(
            "path needs at least 2 entries, got {}",
            path.len()
        )));
    }
    Ok(())
}

/// Referral chains are exactly [L1, L2, L3]; unused levels use the zero address.
pub fn check_ref_chain(chain: &[Address]) -> Result<[Address; REFERRAL_CHAIN_LEN]> {
    <[Address; REFERRAL_CHAIN_LEN]>::try_from(chain).map_err(|_| {
        Error::invalid(format!(
            "referral chain must have exactly {} entries, got {}",
            REFERRAL_CHAIN_LEN,
            chain.len()
        ))
    })
}

/// Validate a referral model id and referrer as typed by a user.
pub fn validate_referral_inputs(referral_model_id: &str, referrer: &str) -> Result<(u64, Address)> {
    let model_id = referral_model_id
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::invalid(format!("invalid referral model id: {:?}", referral_model_id)))?;
    Ok((model_id, parse_address(referrer)?))
}

/// Validate a token claim's output token and minimum output.
pub fn validate_claim_token(token_out: &str, min_out: &str) -> Result<(Address, U256)> {
    let token = parse_address(token_out)?;
    let min_out = parse_amount(min_out)?;
    Ok((token, min_out))
}

/// Validate a claim path: at least two entries, every entry an address.
pub fn validate_claim_path<S: AsRef<str>>(path: &[S]) -> Result<Vec<Address>> {
    let parsed = path
        .iter()
        .map(|s| parse_address(s.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    check_path(&parsed)?;
    Ok(parsed)
}

/// Validate an [L1, L2, L3] chain given as strings.
pub fn validate_ref_chain<S: AsRef<str>>(chain: &[S]) -> Result<[Address; REFERRAL_CHAIN_LEN]> {
    let parsed = chain
        .iter()
        .map(|s| parse_address(s.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    check_ref_chain(&parsed)
}

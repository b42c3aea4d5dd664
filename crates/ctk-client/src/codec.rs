// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CODEC - JSON argument encoding and return-tuple decoding
//
// Amounts travel as decimal strings; addresses as checksummed hex.
// Return tuples may arrive positional (array) or named (object), and
// integers may be JSON numbers or numeric strings.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use ctk_core::math::parse_amount;
use ctk_core::{
    Address, Error, FeeConfig, Quote, Receipt, ReferralModel, ReferralSnapshot, Result, U256,
};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────
// ENCODING
// ─────────────────────────────────────────────────────────────────

pub fn u256_arg(value: U256) -> Value {
    Value::String(value.to_string())
}

pub fn u64_arg(value: u64) -> Value {
    Value::String(value.to_string())
}

pub fn address_arg(address: Address) -> Value {
    Value::String(address.to_checksum(None))
}

pub fn path_arg(path: &[Address]) -> Value {
    Value::Array(path.iter().copied().map(address_arg).collect())
}

// ─────────────────────────────────────────────────────────────────
// SCALAR DECODING
// ─────────────────────────────────────────────────────────────────

pub fn as_u256(value: &Value) -> Option<U256> {
    match value {
        Value::String(s) => parse_amount(s.trim()).ok(),
        Value::Number(n) => parse_amount(&n.to_string()).ok(),
        _ => None,
    }
}

pub fn as_u64(value: &Value) -> Option<u64> {
    as_u256(value).and_then(|v| u64::try_from(v).ok())
}

pub fn as_address(value: &Value) -> Option<Address> {
    value.as_str().and_then(|s| s.trim().parse::<Address>().ok())
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_address_list(value: &Value) -> Option<Vec<Address>> {
    value.as_array()?.iter().map(as_address).collect()
}

/// Field `index` of a positional tuple, or `name` of a named one.
fn field<'a>(tuple: &'a Value, index: usize, name: &str) -> Option<&'a Value> {
    match tuple {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(name),
        _ => None,
    }
}

fn malformed(operation: &str, what: &str) -> Error {
    Error::remote(operation, format!("malformed response: {}", what))
}

fn required<T>(
    tuple: &Value,
    index: usize,
    name: &str,
    operation: &str,
    decode: impl Fn(&Value) -> Option<T>,
) -> Result<T> {
    field(tuple, index, name)
        .and_then(decode)
        .ok_or_else(|| malformed(operation, name))
}

// ─────────────────────────────────────────────────────────────────
// TUPLE DECODING
// ─────────────────────────────────────────────────────────────────

pub fn decode_u256(result: &Value, operation: &str) -> Result<U256> {
    as_u256(result).ok_or_else(|| malformed(operation, "expected uint256"))
}

pub fn decode_bool(result: &Value, operation: &str) -> Result<bool> {
    as_bool(result).ok_or_else(|| malformed(operation, "expected bool"))
}

pub fn decode_u8(result: &Value, operation: &str) -> Result<u8> {
    as_u64(result)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| malformed(operation, "expected uint8"))
}

pub fn decode_address(result: &Value, operation: &str) -> Result<Address> {
    as_address(result).ok_or_else(|| malformed(operation, "expected address"))
}

/// `quoteBestPath` → `(router, path, amountOut)`.
pub fn decode_quote(result: &Value) -> Result<Quote> {
    let op = "quoteBestPath";
    Ok(Quote {
        router: required(result, 0, "router", op, as_address)?,
        path: required(result, 1, "path", op, as_address_list)?,
        amount_out: required(result, 2, "amountOut", op, as_u256)?,
    })
}

/// `referralUserSnapshot` → `(claimable, pending, l1, l2, l3, tier, volume)`.
pub fn decode_snapshot(result: &Value) -> Result<ReferralSnapshot> {
    let op = "referralUserSnapshot";
    let tier = required(result, 5, "tier", op, as_u64)?;
    Ok(ReferralSnapshot {
        claimable: required(result, 0, "claimable", op, as_bool)?,
        pending: required(result, 1, "pending", op, as_u256)?,
        level1: required(result, 2, "l1", op, as_address)?,
        level2: required(result, 3, "l2", op, as_address)?,
        level3: required(result, 4, "l3", op, as_address)?,
        tier: u8::try_from(tier).map_err(|_| malformed(op, "tier"))?,
        volume: required(result, 6, "volume", op, as_u256)?,
    })
}

/// `getReferralModel` → `(id, levelBps, active, levels, locked)`.
pub fn decode_referral_model(result: &Value) -> Result<ReferralModel> {
    let op = "getReferralModel";
    let level_bps = required(result, 1, "levelBps", op, |v| {
        v.as_array()?
            .iter()
            .map(|bp| as_u64(bp).and_then(|x| u16::try_from(x).ok()))
            .collect::<Option<Vec<u16>>>()
    })?;
    let levels = required(result, 3, "levels", op, as_u64)?;
    Ok(ReferralModel {
        id: required(result, 0, "id", op, as_u256)?,
        level_bps,
        active: required(result, 2, "active", op, as_bool)?,
        levels: u8::try_from(levels).map_err(|_| malformed(op, "levels"))?,
        locked: required(result, 4, "locked", op, as_bool)?,
    })
}

/// `feeConfig` → `(defaultPlatformBP, vipPlatformBP, premiumPlatformBP, maxReferralTotalBP)`.
pub fn decode_fee_config(result: &Value) -> Result<FeeConfig> {
    let op = "feeConfig";
    let bp = |v: &Value| as_u64(v).and_then(|x| u16::try_from(x).ok());
    Ok(FeeConfig {
        default_platform_bp: required(result, 0, "defaultPlatformBP", op, bp)?,
        vip_platform_bp: required(result, 1, "vipPlatformBP", op, bp)?,
        premium_platform_bp: required(result, 2, "premiumPlatformBP", op, bp)?,
        max_referral_total_bp: required(result, 3, "maxReferralTotalBP", op, bp)?,
    })
}

/// Normalize a `/call-contract` success body into a [`Receipt`].
///
/// The receipt fields may sit at the top level or under `result`. An
/// explicit `success: false` is a reverted transaction.
pub fn decode_receipt(body: &Value, operation: &str) -> Result<Receipt> {
    let inner = body.get("result").filter(|r| r.is_object());
    let lookup = |key: &str| {
        body.get(key)
            .or_else(|| inner.and_then(|r| r.get(key)))
            .filter(|v| !v.is_null())
    };

    if lookup("success").and_then(as_bool) == Some(false) {
        let reason = lookup("output")
            .or_else(|| lookup("msg"))
            .and_then(Value::as_str)
            .unwrap_or("execution reverted");
        return Err(Error::remote(operation, reason));
    }

    let tx_hash = lookup("tx_hash")
        .or_else(|| lookup("transactionHash"))
        .or_else(|| lookup("block_hash"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(operation, "missing tx_hash"))?
        .to_string();

    Ok(Receipt {
        tx_hash,
        block_number: lookup("block_number").and_then(as_u64),
        gas_used: lookup("gas_used").and_then(as_u64),
    })
}

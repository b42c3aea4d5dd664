// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIER RESOLUTION
//
// Maps an accumulated trading volume to a fee/privilege tier using an
// unordered threshold table. Tiers are monotonic privilege levels, so the
// highest tier among all satisfied rules wins regardless of table order.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::Result;
use crate::math::parse_amount;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRule {
    pub min_volume: U256,
    pub tier: u8,
}

impl TierRule {
    pub fn new(min_volume: U256, tier: u8) -> Self {
        Self { min_volume, tier }
    }
}

/// Highest tier whose `min_volume <= volume`; 0 when nothing matches or the
/// table is empty.
pub fn resolve_tier(volume: U256, rules: &[TierRule]) -> u8 {
    let mut chosen = 0u8;
    for rule in rules {
        if volume >= rule.min_volume && rule.tier > chosen {
            chosen = rule.tier;
        }
    }
    chosen
}

/// Same as [`resolve_tier`] for a volume given as a decimal or hex string.
pub fn determine_requested_tier(volume: &str, rules: &[TierRule]) -> Result<u8> {
    Ok(resolve_tier(parse_amount(volume)?, rules))
}

/// Parse a serialized rule table such as
/// `[{"minVolume":"5000000000000000000000","tier":1}]`.
///
/// Missing or unparsable input, or anything that is not a JSON list, yields
/// an empty table. Entries without `minVolume`/`tier`, with a non-numeric,
/// fractional or negative `minVolume`, or with a tier above 255 are dropped.
/// Numeric thresholds may use exponent form (`1e22`).
pub fn parse_tier_rules(raw: Option<&str>) -> Vec<TierRule> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ignoring tier rules, invalid JSON: {}", e);
            return Vec::new();
        }
    };
    let Some(entries) = parsed.as_array() else {
        log::warn!("ignoring tier rules, expected a JSON list");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let rule = parse_rule(entry);
            if rule.is_none() {
                log::debug!("skipping malformed tier rule: {}", entry);
            }
            rule
        })
        .collect()
}

fn parse_rule(entry: &Value) -> Option<TierRule> {
    let min_volume = match entry.get("minVolume")? {
        Value::String(s) => parse_amount(s).ok()?,
        Value::Number(n) => whole_number(&n.to_string())?,
        _ => return None,
    };
    let tier = u8::try_from(entry.get("tier")?.as_u64()?).ok()?;
    Some(TierRule { min_volume, tier })
}

/// Exact value of a JSON number literal such as `5000`, `5000.0` or `1e22`.
/// Negative and fractional values yield `None`.
fn whole_number(literal: &str) -> Option<U256> {
    if literal.starts_with('-') {
        return None;
    }
    let (mantissa, exponent) = match literal.find(|c| c == 'e' || c == 'E') {
        Some(at) => (&literal[..at], literal[at + 1..].parse::<i64>().ok()?),
        None => (literal, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let mut digits = format!("{}{}", int_part, frac_part);
    let scale = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
    if scale < 0 {
        let cut = usize::try_from(scale.unsigned_abs()).ok()?.min(digits.len());
        let dropped = digits.split_off(digits.len() - cut);
        if dropped.bytes().any(|b| b != b'0') {
            return None;
        }
    }
    let base = if digits.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&digits, 10).ok()?
    };
    if scale <= 0 || base.is_zero() {
        return Some(base);
    }
    // 10^78 already exceeds U256::MAX.
    if scale > 78 {
        return None;
    }
    base.checked_mul(U256::from(10u8).checked_pow(U256::from(scale.unsigned_abs()))?)
}

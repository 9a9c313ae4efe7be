//! Display helpers shared by the panels.

use xln_frames::Amount;

use crate::collection::split_replica_key;

const SHORT_ID_EDGE: usize = 6;

/// Shortens long identifiers (hashes, addresses) to `head…tail`. Short ids
/// and non-ASCII strings are returned unchanged.
pub fn short_id(id: &str) -> String {
    let prefix = if id.starts_with("0x") { 2 } else { 0 };
    if !id.is_ascii() || id.len() <= prefix + SHORT_ID_EDGE * 2 + 1 {
        return id.to_string();
    }
    let head = &id[..prefix + SHORT_ID_EDGE];
    let tail = &id[id.len() - SHORT_ID_EDGE..];
    format!("{head}…{tail}")
}

/// `entity / signer` with both halves shortened. Keys without a signer show
/// only the entity.
pub fn format_replica_key(key: &str) -> String {
    let parts = split_replica_key(key);
    match parts.signer_id {
        Some(signer) => format!("{} / {}", short_id(parts.entity_id), short_id(signer)),
        None => short_id(parts.entity_id),
    }
}

/// Fixed-point rendering with thousands separators and trailing zeros trimmed:
/// `1234500000` with 6 decimals is `1,234.5`.
pub fn format_amount(amount: &Amount, decimals: u8) -> String {
    let (whole, frac) = amount.split_decimals(decimals);
    let grouped = group_thousands(&whole);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Relative expiry for a unix-seconds deadline: `expired`, `in 45s`,
/// `in 12m`, `in 3h 5m`, `in 2d 4h`. Deadlines beyond `u64` are `never`.
pub fn format_expiry(expires_at: &Amount, now_secs: u64) -> String {
    let Some(deadline) = expires_at.to_u64() else {
        return "never".to_string();
    };
    if deadline <= now_secs {
        return "expired".to_string();
    }
    let left = deadline - now_secs;
    let (days, hours, minutes) = (left / 86_400, (left % 86_400) / 3_600, (left % 3_600) / 60);
    if days > 0 {
        format!("in {days}d {hours}h")
    } else if hours > 0 {
        format!("in {hours}h {minutes}m")
    } else if minutes > 0 {
        format!("in {minutes}m")
    } else {
        format!("in {left}s")
    }
}

//! Identity key extraction from raw ledger strings

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of leading characters compared during exact-id matching
///
/// Shorter identifiers are garbled or foreign exports and are never
/// comparable.
pub const ID_PREFIX_LEN: usize = 20;

static PRODUCT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"P\d+").expect("product code pattern compiles"));

/// Return the first [`ID_PREFIX_LEN`] characters of `s`, or `None` when the
/// string is too short to be comparable
///
/// Lengths are counted in characters, not bytes, so identifiers containing
/// multi-byte text truncate the same way the upstream exports do.
pub fn truncated_id(s: &str) -> Option<String> {
    if s.chars().count() < ID_PREFIX_LEN {
        return None;
    }
    Some(s.chars().take(ID_PREFIX_LEN).collect())
}

/// Extract the first product code from `s`
///
/// A product code is a literal `P` followed by one or more digits,
/// case-sensitive.
pub fn product_code(s: &str) -> Option<&str> {
    PRODUCT_CODE.find(s).map(|m| m.as_str())
}

/// Return the substring after the last hyphen in `s`, or `None` when no
/// hyphen exists
pub fn hyphen_suffix(s: &str) -> Option<&str> {
    s.rsplit_once('-').map(|(_, suffix)| suffix)
}

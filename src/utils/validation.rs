use crate::utils::errors::{CertUtilsError, Result};
use regex::Regex;
use std::sync::LazyLock;

const TAG_VALUE_PATTERN: &str = r"[\p{L}\p{Z}\p{N}_.:/=+\-@]*";

static TAG_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{TAG_VALUE_PATTERN}$")).expect("tag value pattern is valid")
});

/// Every status ACM can report, used when the caller asks for `ALL`
pub const ALL_CERTIFICATE_STATUSES: [&str; 7] = [
    "PENDING_VALIDATION",
    "ISSUED",
    "INACTIVE",
    "EXPIRED",
    "VALIDATION_TIMED_OUT",
    "REVOKED",
    "FAILED",
];

/// Check a tag value against the character set AWS accepts for tags.
/// The empty value is always accepted.
pub fn check_tag_value_pattern(value: &str) -> Result<()> {
    if value.is_empty() || TAG_VALUE_RE.is_match(value) {
        return Ok(());
    }

    Err(CertUtilsError::usage(format!(
        "Invalid tag value. Tag value supports {TAG_VALUE_PATTERN}"
    )))
}

/// Expand a comma-separated status list, `ALL` meaning every status
pub fn split_statuses(statuses: &str) -> Vec<String> {
    if statuses.trim().eq_ignore_ascii_case("all") {
        return ALL_CERTIFICATE_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    statuses
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

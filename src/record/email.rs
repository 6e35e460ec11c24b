//! Structural email check (RFC 5322 "lite", no deliverability lookup).

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of the local part
const MAX_LOCAL_LEN: usize = 64;

/// Maximum length of a whole address
const MAX_ADDRESS_LEN: usize = 254;

/// Dot-atom local part, then at least two DNS labels.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .unwrap()
});

/// Whether `value` is a syntactically valid email address
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > MAX_ADDRESS_LEN {
        return false;
    }
    match value.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_LEN => EMAIL_RE.is_match(value),
        _ => false,
    }
}

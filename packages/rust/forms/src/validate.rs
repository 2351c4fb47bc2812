//! Email address validation.

use std::sync::LazyLock;

use avagenc_shared::{AvagencError, Result};
use regex::Regex;

/// Message shown when an address fails validation.
pub(crate) const INVALID_EMAIL: &str = "Please enter a valid email address.";

/// A local part, an `@`, and a domain containing a dot. No whitespace.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim `raw` and check it looks like an email address.
pub fn validate_email(raw: &str) -> Result<&str> {
    let email = raw.trim();
    if is_valid_email(email) {
        Ok(email)
    } else {
        Err(AvagencError::validation(INVALID_EMAIL))
    }
}

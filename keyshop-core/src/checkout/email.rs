use regex::Regex;
use std::sync::LazyLock;

/// No whitespace, exactly one `@`, a non-empty local part, and a domain
/// with at least two non-empty dot-separated labels.
#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$").expect("email pattern compiles")
});

/// Cheap shape check for a buyer email: `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Base64url-ish runs long enough to be a token, a digest or a JWT segment.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[A-Za-z0-9_\-+/=.$]{24,}").unwrap()
});

/// Mask bearer tokens and password digests embedded in free text.
pub fn redact(input: &str) -> String {
    TOKEN_REGEX
        .replace_all(input, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Mask a login identifier: keep the first character so log lines stay
/// correlatable by a human, hide the rest.
pub fn mask_identifier(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => format!("{first}***"),
    }
}

/// Displays a login identifier in masked form.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask_identifier(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

use tracing::{error, warn};

use crate::logging::pii::{redact, Redacted};
use crate::trace_ctx;

/// A login attempt was refused. `reason` is for operators only; the client
/// always sees the same failure.
pub fn login_failed(reason: &str, identifier: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        identifier = %Redacted(identifier),
        reason,
        "Authentication failure"
    );
}

/// The identity lookup itself failed. Logged apart from credential failures
/// so outages don't look like brute force; `transient` marks retryable ones.
pub fn lookup_failed(identifier: &str, detail: &str, transient: bool) {
    let trace_id = trace_ctx::trace_id();

    error!(
        event = "SECURITY_LOOKUP_FAILED",
        %trace_id,
        identifier = %Redacted(identifier),
        detail = %redact(detail),
        transient,
        "Identity lookup failed during login"
    );
}

/// A bearer token was rejected by the request authenticator.
pub fn token_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        path,
        "Bearer token rejected"
    );
}

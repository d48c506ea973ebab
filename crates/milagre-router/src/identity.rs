//! Caller identity for rate-limit keys

use crate::session::SessionManager;
use axum::http::{header, HeaderMap};

const MAX_IP_LEN: usize = 64;

/// Identity used when no header names the caller
pub const UNKNOWN_CLIENT: &str = "unknown";

fn sanitized_ip(raw: &str) -> Option<String> {
    let candidate = raw.trim();
    if candidate.is_empty() || candidate.len() > MAX_IP_LEN {
        return None;
    }
    candidate
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b':' || b == b'-')
        .then(|| candidate.to_string())
}

fn header_ip(headers: &HeaderMap, key: &str) -> Option<String> {
    let raw = headers.get(key)?.to_str().ok()?;
    sanitized_ip(raw)
}

/// Client IP from proxy headers
///
/// `cf-connecting-ip`, then `x-real-ip`, then the first `x-forwarded-for`
/// entry; `"unknown"` when none holds a plausible address.
pub fn client_ip(headers: &HeaderMap) -> String {
    header_ip(headers, "cf-connecting-ip")
        .or_else(|| header_ip(headers, "x-real-ip"))
        .or_else(|| {
            let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
            sanitized_ip(raw.split(',').next()?)
        })
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Who is calling: `user:<id>` for a valid session token, `ip:<addr>` otherwise
///
/// An invalid or expired token is treated as no token.
pub fn caller_identity(headers: &HeaderMap, sessions: &SessionManager) -> String {
    match bearer_token(headers).map(|token| sessions.validate_token(token)) {
        Some(Ok(claims)) => format!("user:{}", claims.user_id),
        _ => format!("ip:{}", client_ip(headers)),
    }
}

/// Rate-limit key for a route scope
pub fn rate_limit_key(scope: &str, identity: &str) -> String {
    format!("{}:{}", scope, identity)
}

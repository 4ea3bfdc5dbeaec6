//! Derives the key the login limiter buckets attempts under.

use axum::http::HeaderMap;

/// Bucket shared by every request that carries no proxy address header.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Picks the client identifier from proxy headers: `X-Forwarded-For` first,
/// then `X-Real-IP`, then [`UNKNOWN_CLIENT`].
///
/// The header value is used whole, so a forwarded chain such as
/// `"203.0.113.7, 10.0.0.2"` is its own bucket. Empty or non-UTF-8 values
/// fall through to the next source.
pub fn client_id(headers: &HeaderMap) -> String {
    ["x-forwarded-for", "x-real-ip"]
        .iter()
        .find_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

//! Caller key used for rate limiting.

/// Header set by the edge proxy to the single connecting client address.
pub const CONNECTING_IP_HEADER: &str = "cf-connecting-ip";

/// Standard proxy chain header; the first entry is the original client.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Shared bucket for callers whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Pick the rate-limit key for a request.
///
/// The proxy's connecting-ip header wins, then the first forwarded-for entry,
/// then [`UNKNOWN_CLIENT`]. Blank values count as absent. Every caller without
/// either header shares the same bucket.
pub fn client_key(connecting_ip: Option<&str>, forwarded_for: Option<&str>) -> String {
    if let Some(ip) = connecting_ip.map(str::trim).filter(|ip| !ip.is_empty()) {
        return ip.to_string();
    }
    forwarded_for
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

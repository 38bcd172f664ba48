//! Client identity extraction for throttling.

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Bucket shared by requests whose origin cannot be determined.
pub const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Determines the client address of a request.
///
/// The socket peer address is authoritative. When `behind_proxy` is set, the
/// first `X-Forwarded-For` entry, then `X-Real-IP`, take precedence; enable
/// that only behind a trusted reverse proxy, since clients control these
/// headers.
///
/// Falls back to [`UNKNOWN_CLIENT`] when neither source yields an address.
pub fn client_ip<B>(req: &Request<B>, behind_proxy: bool) -> IpAddr {
    if behind_proxy && let Some(ip) = forwarded_ip(req.headers()) {
        return ip;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_CLIENT)
}

/// Parses the originating client address from proxy headers.
///
/// Handles both bare addresses (`203.0.113.7`, `2001:db8::1`) and addresses
/// with ports (`203.0.113.7:5000`, `[2001:db8::1]:5000`).
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(parse_ip);

    from_forwarded_for.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_ip)
    })
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    let value = value.trim();

    value
        .parse::<IpAddr>()
        .ok()
        .or_else(|| value.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

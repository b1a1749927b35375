//! Device fingerprint extraction.
//!
//! A session is bound at login to the `{user_agent, ip, device_id}` triple
//! observed on the request, and the same triple is re-derived at refresh for
//! comparison. Extraction is deterministic and side-effect-free, so the two
//! derivations agree for an unchanged client.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Fallback user-agent when the client sends none.
const UNKNOWN_USER_AGENT: &str = "unknown";

/// Device fingerprint captured at login and re-checked at refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `user-agent` header, or `"unknown"` when absent.
    pub user_agent: String,
    /// First `x-forwarded-for` entry, else the socket peer address.
    pub ip: Option<String>,
    /// Optional client-supplied `x-device-id` header.
    pub device_id: Option<String>,
}

impl DeviceInfo {
    /// Derive a fingerprint from request headers and (optionally) the peer
    /// socket address.
    ///
    /// Precedence for the ip: the explicit `x-forwarded-for` header wins
    /// over the socket-reported address; only its first entry (the original
    /// client) is used.
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let user_agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(UNKNOWN_USER_AGENT)
            .to_string();

        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let ip = forwarded.or_else(|| peer.map(|addr| addr.ip().to_string()));

        let device_id = headers
            .get("x-device-id")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .filter(|v| !v.is_empty());

        Self {
            user_agent,
            ip,
            device_id,
        }
    }
}

impl<S> FromRequestParts<S> for DeviceInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // ConnectInfo is only present when the server is started with
        // `into_make_service_with_connect_info`; tests drive the router
        // directly, so the peer address is optional.
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        Ok(DeviceInfo::from_headers(&parts.headers, peer))
    }
}

//! Client address resolution.
//!
//! # Design Decisions
//! - Forwarding headers are trusted as-is; put this behind a proxy you control
//! - Lookup order: `True-Client-IP`, `X-Real-IP`, first `X-Forwarded-For` entry,
//!   then the connection's peer address

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::middleware::Next;

use crate::http::context::RealIp;
use crate::routing::Middleware;
use crate::Request;

const FORWARDING_HEADERS: [&str; 3] = ["true-client-ip", "x-real-ip", "x-forwarded-for"];

/// Store the resolved client address as a [`RealIp`] extension.
pub fn real_ip() -> Middleware {
    Middleware::from_fn(|mut request: Request, next: Next| async move {
        let forwarded = forwarded_ip(request.headers());
        if let Some(ip) = forwarded.or_else(|| peer_ip(&request)) {
            request.extensions_mut().insert(RealIp(ip));
        }
        next.run(request).await
    })
}

/// Best-known client address: the resolved one, else the peer address.
pub(crate) fn client_ip(request: &Request) -> Option<IpAddr> {
    crate::http::context::real_ip(request).or_else(|| peer_ip(request))
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    FORWARDING_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(|value| value.split_once(',').map_or(value, |(first, _)| first).trim())
        .find_map(|value| value.parse().ok())
}

fn peer_ip(request: &Request) -> Option<IpAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

//! Rate limiting middleware using token bucket algorithm.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Keys requests by client IP.
///
/// Behind a trusted reverse proxy the IP comes from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`; otherwise from the peer socket address.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

pub type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build(behind_proxy: bool, per_second: u64, burst_size: u32) -> Result<RateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { behind_proxy })
        .per_second(per_second)
        .burst_size(burst_size)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit configuration"))?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Creates a rate limiter for public endpoints (login page, health).
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer(behind_proxy: bool) -> Result<RateLimitLayer> {
    build(behind_proxy, 2, 100)
}

/// Creates a stricter rate limiter for credential checks.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// Applied to the login endpoints to slow down password guessing.
pub fn secure_layer(behind_proxy: bool) -> Result<RateLimitLayer> {
    build(behind_proxy, 1, 10)
}

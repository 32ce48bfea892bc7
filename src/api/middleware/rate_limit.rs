//! Rate limiting middleware using token bucket algorithm.
//!
//! Limits are applied per client IP. By default the IP is the socket peer
//! address; behind a trusted reverse proxy it is read from
//! `X-Forwarded-For` / `X-Real-IP` instead.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Seconds per replenished request.
    pub per_second: u64,
    pub burst_size: u32,
}

/// Limits for general API endpoints: burst of 100, one request replenished every 2 seconds.
pub const RELAXED: Limits = Limits {
    per_second: 2,
    burst_size: 100,
};

/// Limits for credential-handling endpoints: burst of 10, one request replenished every second.
///
/// Used for login, registration, token refresh and password reset, where
/// a tight limit slows down credential stuffing.
pub const STRICT: Limits = Limits {
    per_second: 1,
    burst_size: 10,
};

/// Wraps `router` in a rate limiter.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let auth = rate_limit::apply(auth_routes(), rate_limit::STRICT, config.behind_proxy);
/// ```
pub fn apply<S>(router: Router<S>, limits: Limits, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(layer(SmartIpKeyExtractor, limits))
    } else {
        router.layer(layer(PeerIpKeyExtractor, limits))
    }
}

fn layer<K>(
    key_extractor: K,
    limits: Limits,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(limits.per_second)
            .burst_size(limits.burst_size)
            .finish()
            .expect("rate limit values are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

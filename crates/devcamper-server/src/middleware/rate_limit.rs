//! Rate limiting middleware using tower-governor
//!
//! Requests are keyed by peer IP, so the server must be started with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use std::sync::Arc;

use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::config::RateLimitConfig;

/// Milliseconds between replenished requests, and the burst size
fn quota(config: &RateLimitConfig) -> (u64, u32) {
    let per_minute = config.requests_per_minute.max(1);
    let replenishment_ms = (60_000 / per_minute).max(1);
    let burst_size = u32::try_from(per_minute).unwrap_or(u32::MAX);
    (replenishment_ms, burst_size)
}

/// Wrap `router` in a per-IP rate limiter when enabled
pub fn with_rate_limit<S>(router: Router<S>, config: &RateLimitConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.enabled {
        return router;
    }

    let (replenishment_ms, burst_size) = quota(config);
    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_millisecond(replenishment_ms)
        .burst_size(burst_size)
        .finish()
    else {
        tracing::warn!(?config, "Invalid rate limit settings, rate limiting disabled");
        return router;
    };

    tracing::info!(
        requests_per_minute = config.requests_per_minute,
        "Rate limiting enabled"
    );
    router.layer(GovernorLayer {
        config: Arc::new(governor_conf),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota() {
        let config = RateLimitConfig {
            enabled: true,
            requests_per_minute: 100,
        };
        assert_eq!(quota(&config), (600, 100));
    }

    #[test]
    fn test_quota_never_zero() {
        let config = RateLimitConfig {
            enabled: true,
            requests_per_minute: 0,
        };
        assert_eq!(quota(&config), (60_000, 1));

        let fast = RateLimitConfig {
            enabled: true,
            requests_per_minute: 120_000,
        };
        assert_eq!(quota(&fast).0, 1);
    }

    #[test]
    fn test_disabled_layer_is_noop() {
        let config = RateLimitConfig {
            enabled: false,
            requests_per_minute: 100,
        };
        let _router: Router = with_rate_limit(Router::new(), &config);
    }
}

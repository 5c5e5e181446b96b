use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::infrastructure::config::RateLimitConfig;

/// Stop tracking addresses beyond this many, stale entries are purged first.
const MAX_TRACKED_IPS: usize = 10_000;

/// Sliding-window request counter keyed by client address.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    state: RwLock<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Records the request and tells whether it is within budget.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let cutoff = now.checked_sub(self.window).unwrap_or(now);
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if !state.contains_key(&ip) && state.len() >= MAX_TRACKED_IPS {
            state.retain(|_, timestamps| timestamps.iter().any(|t| *t > cutoff));
            if state.len() >= MAX_TRACKED_IPS {
                warn!("rate limiter tracks too many addresses, rejecting {ip}");
                return false;
            }
        }

        let timestamps = state.entry(ip).or_default();
        timestamps.retain(|t| *t > cutoff);
        if timestamps.len() >= self.max_requests {
            return false;
        }
        timestamps.push(now);

        true
    }
}

/// The general API budget and the stricter one for login and sign-up.
pub struct RateLimiters {
    api: RateLimiter,
    auth: RateLimiter,
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_secs);
        Self {
            api: RateLimiter::new(config.api_max_requests, window),
            auth: RateLimiter::new(config.auth_max_requests, window),
        }
    }
}

pub async fn rate_limit(
    State(limiters): State<Arc<RateLimiters>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if path != "/api" && !path.starts_with("/api/") {
        return next.run(request).await;
    }

    // Without connection info (in-process callers) everyone shares one bucket.
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    // Login and sign-up spend from both budgets.
    if !limiters.api.check(ip) {
        info!("rate limit exceeded for {ip} on {path}");
        return ApiError::TooManyRequests.into_response();
    }
    if path.starts_with("/api/auth/") && !limiters.auth.check(ip) {
        info!("auth rate limit exceeded for {ip} on {path}");
        return ApiError::TooManyAuthAttempts.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_limit_within_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        let now = Instant::now();

        assert!(limiter.check_at(ip, now));
        assert!(limiter.check_at(ip, now));
        assert!(!limiter.check_at(ip, now));
        assert!(limiter.check_at(other, now));
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let now = Instant::now();

        assert!(limiter.check_at(ip, now));
        assert!(!limiter.check_at(ip, now + Duration::from_secs(30)));
        assert!(limiter.check_at(ip, now + Duration::from_secs(61)));
    }
}

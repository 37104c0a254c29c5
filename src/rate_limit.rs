use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::config::RateLimitConfig;

/// Fixed-window per-IP request limiter. Only mounted in production
/// mode, mirroring the development/production split of the config.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

struct Bucket {
    window_start: Instant,
    count: u32,
}

/// Map size at which expired buckets are swept before inserting.
const SWEEP_THRESHOLD: usize = 1024;

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request from `ip` and reports whether it is within
    /// the current window's budget.
    pub fn allow(&self, ip: IpAddr) -> bool {
        self.allow_at(ip, Instant::now())
    }

    fn allow_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter lock poisoned");
        if buckets.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            buckets.retain(|_, b| now.duration_since(b.window_start) < window);
        }
        let bucket = buckets.entry(ip).or_insert(Bucket {
            window_start: now,
            count: 0,
        });
        if now.duration_since(bucket.window_start) >= self.window {
            bucket.window_start = now;
            bucket.count = 0;
        }
        bucket.count += 1;
        bucket.count <= self.max_requests
    }
}

pub async fn limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.allow(addr.ip()) {
        next.run(req).await
    } else {
        warn!(ip = %addr.ip(), "rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Too many requests from this IP, please try again later."
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests: max,
            window_secs,
        })
    }

    #[test]
    fn allows_up_to_budget_then_rejects() {
        let l = limiter(3, 60);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let now = Instant::now();
        assert!(l.allow_at(ip, now));
        assert!(l.allow_at(ip, now));
        assert!(l.allow_at(ip, now));
        assert!(!l.allow_at(ip, now));
    }

    #[test]
    fn budget_resets_after_window() {
        let l = limiter(1, 1);
        let ip: IpAddr = "10.0.0.2".parse().unwrap();
        let now = Instant::now();
        assert!(l.allow_at(ip, now));
        assert!(!l.allow_at(ip, now));
        assert!(l.allow_at(ip, now + Duration::from_secs(2)));
    }

    #[test]
    fn expired_buckets_are_swept_out() {
        let l = limiter(5, 1);
        let now = Instant::now();
        for i in 0..SWEEP_THRESHOLD as u32 {
            let ip = IpAddr::V4(std::net::Ipv4Addr::from(0x0a00_0000 + i));
            assert!(l.allow_at(ip, now));
        }
        assert_eq!(
            l.buckets.lock().unwrap().len(),
            SWEEP_THRESHOLD,
            "nothing expired yet"
        );

        // All windows lapse; the next request triggers a sweep instead
        // of letting the map keep one bucket per IP ever seen.
        let later = now + Duration::from_secs(2);
        assert!(l.allow_at("192.168.0.1".parse().unwrap(), later));
        assert_eq!(l.buckets.lock().unwrap().len(), 1);
    }

    #[test]
    fn budgets_are_per_ip() {
        let l = limiter(1, 60);
        let now = Instant::now();
        assert!(l.allow_at("10.0.0.3".parse().unwrap(), now));
        assert!(l.allow_at("10.0.0.4".parse().unwrap(), now));
        assert!(!l.allow_at("10.0.0.3".parse().unwrap(), now));
    }
}

//! Per-client request throttling for link creation.
//!
//! Two policies share one client key:
//!
//! - **Slow-down**: once a client has made more than `delay_after` requests in
//!   the window, each further request is delayed by `delay_step` per excess
//!   request, up to `max_delay`.
//! - **Hard cap**: at most `max_requests` admissions per window, enforced by a
//!   GCRA keyed limiter. Excess requests fail with `429 Too Many Requests`.

use std::collections::VecDeque;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use dashmap::DashMap;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::time::Instant;

use crate::error::AppError;

/// Counter of requests rejected by the hard cap.
pub const THROTTLED_METRIC: &str = "emoji_shortener_throttled_total";

/// Counter of requests delayed by the slow-down policy.
pub const SLOWED_METRIC: &str = "emoji_shortener_slowed_total";

/// Throttling limits applied per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub window: Duration,
    pub max_requests: u32,
    pub delay_after: u32,
    pub delay_step: Duration,
    pub max_delay: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30),
            max_requests: 1,
            delay_after: 1,
            delay_step: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl ThrottlePolicy {
    /// A policy that never delays and admits `u32::MAX` requests per window.
    pub fn permissive() -> Self {
        Self {
            window: Duration::from_secs(1),
            max_requests: u32::MAX,
            delay_after: u32::MAX,
            delay_step: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = (self.window / burst.get()).max(Duration::from_nanos(1));

        Quota::with_period(period)
            .map_or_else(|| Quota::per_second(burst), |quota| quota.allow_burst(burst))
    }
}

/// Shared throttling state keyed by client address.
pub struct Throttler {
    policy: ThrottlePolicy,
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    hits: DashMap<IpAddr, VecDeque<Instant>>,
    behind_proxy: bool,
}

impl Throttler {
    pub fn new(policy: ThrottlePolicy, behind_proxy: bool) -> Self {
        Self {
            policy,
            limiter: RateLimiter::keyed(policy.quota()),
            hits: DashMap::new(),
            behind_proxy,
        }
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    /// Whether client addresses are read from forwarding headers.
    pub fn behind_proxy(&self) -> bool {
        self.behind_proxy
    }

    /// Records a request from `client` and returns how long to hold it.
    pub fn slow_down_delay(&self, client: IpAddr) -> Duration {
        let now = Instant::now();
        let window = self.policy.window;

        let hits = {
            let mut log = self.hits.entry(client).or_default();
            while log
                .front()
                .is_some_and(|&hit| now.duration_since(hit) >= window)
            {
                log.pop_front();
            }
            log.push_back(now);
            while log.len() > self.hit_log_cap() {
                log.pop_front();
            }
            log.len()
        };

        let excess = hits.saturating_sub(self.policy.delay_after as usize);
        if excess == 0 {
            return Duration::ZERO;
        }

        let delay = self
            .policy
            .delay_step
            .saturating_mul(u32::try_from(excess).unwrap_or(u32::MAX))
            .min(self.policy.max_delay);

        if !delay.is_zero() {
            metrics::counter!(SLOWED_METRIC).increment(1);
        }
        delay
    }

    /// Hits past this count cannot raise the delay above `max_delay`.
    fn hit_log_cap(&self) -> usize {
        let step = self.policy.delay_step.as_nanos();
        let steps = if step == 0 {
            1
        } else {
            self.policy.max_delay.as_nanos().div_ceil(step).max(1)
        };

        (self.policy.delay_after as usize)
            .saturating_add(usize::try_from(steps).unwrap_or(usize::MAX))
    }

    /// Admits a request from `client` or rejects it with a retry hint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TooManyRequests`] once the client has used its
    /// allowance for the current window.
    pub fn admit(&self, client: IpAddr) -> Result<(), AppError> {
        match self.limiter.check_key(&client) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);

                metrics::counter!(THROTTLED_METRIC).increment(1);
                tracing::info!(client = %client, retry_after_secs, "Request throttled");

                Err(AppError::too_many_requests(
                    "Too many requests, please try again later",
                    retry_after_secs.max(1),
                ))
            }
        }
    }

    /// Drops state for clients that have been idle for a full window.
    pub fn retain_recent(&self) {
        let now = Instant::now();
        let window = self.policy.window;

        self.hits.retain(|_, log| {
            log.retain(|&hit| now.duration_since(hit) < window);
            !log.is_empty()
        });
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients with recorded slow-down hits.
    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}

use governor::clock::{QuantaClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Jitter, Quota};
use std::num::NonZeroU32;
use std::time::Duration;

type DirectLimiter =
    governor::RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

/// Token bucket shared by every request a client makes to the node.
pub struct RateLimiter {
    limiter: DirectLimiter,
    jitter: Jitter,
}

impl RateLimiter {
    /// A zero rate is treated as one request per second.
    pub fn new(requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: governor::RateLimiter::direct(Quota::per_second(rate)),
            jitter: Jitter::up_to(Duration::from_millis(10)),
        }
    }

    /// Waits until a request may be issued.
    pub async fn acquire(&self) {
        self.limiter.until_ready_with_jitter(self.jitter).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_is_bounded_by_rate() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.limiter.check().is_ok());
        assert!(limiter.limiter.check().is_ok());
        assert!(!limiter.limiter.check().is_ok());
    }

    #[tokio::test]
    async fn test_acquire_waits_for_refill() {
        let limiter = RateLimiter::new(50);
        for _ in 0..50 {
            limiter.acquire().await;
        }
        let started = std::time::Instant::now();
        limiter.acquire().await;
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_zero_rate_still_admits() {
        let limiter = RateLimiter::new(0);
        assert!(limiter.limiter.check().is_ok());
    }
}

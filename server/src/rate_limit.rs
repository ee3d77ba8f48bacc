use std::time::{Duration, Instant};

use dashmap::DashMap;
use rocket::http::Status;

use crate::identity::Identity;

#[derive(Debug)]
pub struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
            capacity,
            refill_interval,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill(Instant::now());
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill);
        let intervals = elapsed.as_millis() / self.refill_interval.as_millis().max(1);

        if intervals > 0 {
            self.tokens = self.capacity;
            self.last_refill = now;
        }
    }
}

/// Game creation budget per identity.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: u32,
    refill_interval: Duration,
}

impl RateLimiter {
    pub fn per_minute(capacity: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_interval: Duration::from_secs(60),
        }
    }

    pub fn check(&self, identity: &Identity) -> Result<(), Status> {
        let mut entry = self
            .buckets
            .entry(identity.uid.clone())
            .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_interval));

        if entry.try_consume() {
            Ok(())
        } else {
            Err(Status::TooManyRequests)
        }
    }
}

//! Per-chat sliding window limiter
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Keyed by chat id
//! - 1.0.0: Initial release with per-user sliding window rate limiting

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<i64, Vec<Instant>>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: Arc::new(DashMap::new()),
            max_requests,
            time_window,
        }
    }

    /// Record a command from `chat_id`; false when the chat is over its limit
    pub fn check(&self, chat_id: i64) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry(chat_id).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }
}

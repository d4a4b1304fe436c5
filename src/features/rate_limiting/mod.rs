//! # Rate Limiting Feature
//!
//! Prevents command floods with a per-chat sliding window.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod limiter;

pub use limiter::RateLimiter;

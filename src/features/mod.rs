//! # Features
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.7.0

pub mod rate_limiting;
pub mod reminders;

pub use rate_limiting::RateLimiter;
pub use reminders::{ReminderScheduler, ReminderSender};

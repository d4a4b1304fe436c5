// Core layer - shared types and configuration
pub mod core;

// Features layer - reminders and rate limiting
pub mod features;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::{RateLimiter, ReminderScheduler, ReminderSender};

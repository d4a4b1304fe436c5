//! # Core Module
//!
//! Configuration and shared reply utilities for the reminder bot.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Config gains timezone and rate limit settings
//! - 1.1.0: Add response module with Discord message splitting
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod response;

pub use config::Config;
pub use response::{split_for_message, split_reply, MESSAGE_LIMIT};

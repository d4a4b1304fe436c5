//! # Reminders Feature
//!
//! Persisted one-shot and recurring reminders delivered by per-reminder timers.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Recurring reminders, reminders for other contacts, startup recovery
//! - 1.0.0: One-shot reminders

pub mod delivery;
pub mod model;
pub mod scheduler;

pub use delivery::{DiscordSender, ReminderSender};
pub use model::{NewReminder, Reminder};
pub use scheduler::{FireOutcome, RecoveryReport, ReminderScheduler};

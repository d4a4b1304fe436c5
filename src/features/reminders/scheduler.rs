//! Reminder scheduler
//!
//! Turns persisted reminders into armed tokio timers, delivers them when they
//! come due and advances recurring ones.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: One timer per reminder (replaces polling loop), recurring reminders,
//!   immediate delivery of overdue reminders on recovery
//! - 1.0.0: Polling scheduler for one-shot reminders

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dashmap::DashMap;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::delivery::ReminderSender;
use super::model::{format_local, Reminder};
use crate::database::Database;

/// Longest single sleep; the wall clock is re-checked after each chunk.
const MAX_SLEEP_CHUNK: Duration = Duration::from_secs(6 * 60 * 60);

struct ArmedTimer {
    generation: u64,
    fire_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

/// What happened when a reminder's timer went off
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The record was gone (cancelled after arming); nothing was sent
    AlreadyCancelled,
    /// One-shot reminder delivered and deleted
    Completed,
    /// Recurring reminder delivered and re-armed for the given instant
    Rescheduled(DateTime<Utc>),
}

/// Summary of startup recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryReport {
    /// Future reminders armed with their regular delay
    pub armed: usize,
    /// Reminders found at or past their fire time
    pub overdue: usize,
    /// Overdue reminders fired immediately
    pub overdue_fired: usize,
}

/// Owns the `reminder id -> timer` table.
///
/// The table is process-local and rebuilt by [`ReminderScheduler::recover`] on
/// startup. At most one timer exists per reminder id.
#[derive(Clone)]
pub struct ReminderScheduler {
    database: Database,
    sender: Arc<dyn ReminderSender>,
    timezone: Tz,
    armed: Arc<DashMap<i64, ArmedTimer>>,
    generation: Arc<AtomicU64>,
}

impl ReminderScheduler {
    pub fn new(database: Database, sender: Arc<dyn ReminderSender>, timezone: Tz) -> Self {
        ReminderScheduler {
            database,
            sender,
            timezone,
            armed: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a timer for `reminder.fire_at`, replacing any timer already armed for its id.
    ///
    /// A fire time that is already in the past fires immediately.
    pub fn arm(&self, reminder: Reminder) {
        let id = reminder.id;
        let fire_at = reminder.fire_at;
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let (registered_tx, registered_rx) = oneshot::channel::<()>();
        let scheduler = self.clone();

        let handle = tokio::spawn(async move {
            // The entry must be in the table before this task may remove it.
            if registered_rx.await.is_err() {
                return;
            }
            sleep_until(fire_at).await;

            let still_current = scheduler
                .armed
                .remove_if(&id, |_, timer| timer.generation == generation)
                .is_some();
            if !still_current {
                debug!("⏭️ Reminder #{id} timer superseded, not firing");
                return;
            }

            if let Err(e) = scheduler.fire(id).await {
                error!("❌ Reminder #{id} failed to fire: {e}");
            }
        });

        let delay = fire_at - Utc::now();
        if delay <= chrono::Duration::zero() {
            debug!("⏰ Reminder #{id} is due now ({}), firing immediately", format_local(fire_at, &self.timezone));
        } else {
            debug!(
                "⏰ Armed reminder #{id} for {} (in {}s)",
                format_local(fire_at, &self.timezone),
                delay.num_seconds()
            );
        }

        let timer = ArmedTimer {
            generation,
            fire_at,
            handle,
        };
        if let Some(previous) = self.armed.insert(id, timer) {
            debug!("🔁 Reminder #{id} re-armed, dropping previous timer");
            previous.handle.abort();
        }
        let _ = registered_tx.send(());
    }

    /// Abort the timer for `id`, if any. Returns whether a timer was armed.
    pub fn disarm(&self, id: i64) -> bool {
        match self.armed.remove(&id) {
            Some((_, timer)) => {
                timer.handle.abort();
                debug!("🛑 Disarmed reminder #{id}");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, id: i64) -> bool {
        self.armed.contains_key(&id)
    }

    /// Instant the currently armed timer for `id` will fire at
    pub fn armed_fire_at(&self, id: i64) -> Option<DateTime<Utc>> {
        self.armed.get(&id).map(|timer| timer.fire_at)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Deliver reminder `id` and advance its lifecycle.
    ///
    /// The record is re-read first: an id that no longer exists was cancelled
    /// after it was armed and is skipped silently.
    pub async fn fire(&self, id: i64) -> Result<FireOutcome> {
        let Some(reminder) = self.database.get_reminder(id).await? else {
            debug!("🗑️ Reminder #{id} no longer exists, treating as cancelled");
            return Ok(FireOutcome::AlreadyCancelled);
        };

        self.deliver(&reminder).await;

        match reminder.next_fire_at() {
            Some(next) => {
                self.database.update_reminder_fire_time(id, next).await?;
                // Cancelled while we were delivering: the update touched nothing.
                let Some(updated) = self.database.get_reminder(id).await? else {
                    return Ok(FireOutcome::AlreadyCancelled);
                };
                info!(
                    "🔁 Reminder #{id} rescheduled for {}",
                    format_local(next, &self.timezone)
                );
                self.arm(updated);
                Ok(FireOutcome::Rescheduled(next))
            }
            None => {
                if reminder.is_recurring() {
                    warn!(
                        "⚠️ Reminder #{id} has no next slot before year 10000, completing it"
                    );
                }
                self.database.delete_reminder(id).await?;
                info!("✅ Reminder #{id} completed");
                Ok(FireOutcome::Completed)
            }
        }
    }

    async fn deliver(&self, reminder: &Reminder) {
        let id = reminder.id;
        let text = format!("⏰ Reminder: {}", reminder.message);

        match self.sender.send(reminder.target_chat_id, &text).await {
            Ok(()) => info!("📤 Delivered reminder #{id} to {}", reminder.target_chat_id),
            Err(e) => {
                warn!("⚠️ Failed to deliver reminder #{id} to {}: {e}", reminder.target_chat_id);
                return;
            }
        }

        if reminder.creator_chat_id != reminder.target_chat_id {
            let target = match self.database.get_contact(reminder.target_chat_id).await {
                Ok(Some(contact)) => format!("{} (id: {})", contact.name, contact.chat_id),
                _ => format!("id: {}", reminder.target_chat_id),
            };
            let notice = format!("📬 Reminder #{id} was delivered to {target}.");
            if let Err(e) = self.sender.send(reminder.creator_chat_id, &notice).await {
                warn!("⚠️ Failed to notify creator of reminder #{id}: {e}");
            }
        }
    }

    /// Re-arm persisted reminders after a restart.
    ///
    /// Every reminder with `fire_at > now` is armed exactly once. Reminders that
    /// came due while the process was down are fired immediately when
    /// `deliver_missed` is set; recurring ones are first moved to their latest
    /// missed slot so they fire once rather than once per missed interval.
    pub async fn recover(&self, now: DateTime<Utc>, deliver_missed: bool) -> Result<RecoveryReport> {
        let future = self.database.list_future_reminders(now).await?;
        let mut report = RecoveryReport {
            armed: future.len(),
            ..RecoveryReport::default()
        };
        for reminder in future {
            self.arm(reminder);
        }

        let overdue = self.database.list_overdue_reminders(now).await?;
        report.overdue = overdue.len();
        for mut reminder in overdue {
            if !deliver_missed {
                warn!(
                    "⚠️ Reminder #{} was due at {} while offline; leaving it unfired",
                    reminder.id,
                    reminder.local_time(&self.timezone)
                );
                continue;
            }

            let slot = reminder.latest_missed_slot(now);
            if slot != reminder.fire_at {
                self.database
                    .update_reminder_fire_time(reminder.id, slot)
                    .await?;
                reminder.fire_at = slot;
            }
            warn!(
                "⚠️ Reminder #{} was missed while offline (due {}), firing now",
                reminder.id,
                reminder.local_time(&self.timezone)
            );
            self.arm(reminder);
            report.overdue_fired += 1;
        }

        info!(
            "♻️ Recovery complete: {} reminders armed, {} overdue ({} fired)",
            report.armed, report.overdue, report.overdue_fired
        );
        Ok(report)
    }
}

/// Sleep until the wall clock reaches `fire_at`
async fn sleep_until(fire_at: DateTime<Utc>) {
    loop {
        let Ok(remaining) = (fire_at - Utc::now()).to_std() else {
            return;
        };
        if remaining.is_zero() {
            return;
        }
        tokio::time::sleep(remaining.min(MAX_SLEEP_CHUNK)).await;
    }
}

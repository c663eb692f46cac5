//! Debounced per-image saving.
//!
//! Every polygon mutation schedules a save of the latest document snapshot for
//! that image. A newer snapshot for the same image supersedes the pending one
//! and restarts its debounce window; pending saves for other images are left
//! alone, so switching images never drops or redirects a save.
//!
//! The scheduler does no I/O and reads no clock: callers pass `now` and hand
//! due saves to a [`DocumentStore`](crate::format::DocumentStore).

use std::time::Duration;
use web_time::Instant;

use crate::format::document::Document;
use crate::model::ImageKey;

/// A document snapshot waiting for its debounce window to pass.
#[derive(Debug, Clone)]
pub struct PendingSave {
    /// Image the snapshot belongs to.
    pub key: ImageKey,
    /// Base name the document is saved under.
    pub base_name: String,
    /// Latest snapshot.
    pub document: Document,
    /// When the save becomes due.
    pub due_at: Instant,
    /// How many snapshots this one superseded.
    pub superseded: u32,
}

/// Manages debounced saves for any number of images.
#[derive(Debug)]
pub struct SaveScheduler {
    /// Quiet period after the latest change before a save fires.
    debounce_delay: Duration,

    /// Pending saves in scheduling order, at most one per image.
    pending: Vec<PendingSave>,

    /// Whether auto-save is enabled.
    enabled: bool,

    /// Time of last successful save.
    last_save: Option<Instant>,

    /// Consecutive failed saves.
    failures: u32,
}

impl SaveScheduler {
    /// Default debounce delay (1 second).
    pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(1000);

    /// Create a new scheduler with default settings.
    pub fn new() -> Self {
        Self {
            debounce_delay: Self::DEFAULT_DEBOUNCE_DELAY,
            pending: Vec::new(),
            enabled: true,
            last_save: None,
            failures: 0,
        }
    }

    /// Create a disabled scheduler. Forced saves still work.
    pub fn disabled() -> Self {
        let mut scheduler = Self::new();
        scheduler.enabled = false;
        scheduler
    }

    /// Set the debounce delay.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Schedule a save of `document` for `key`, superseding any pending one.
    pub fn schedule(
        &mut self,
        key: ImageKey,
        base_name: impl Into<String>,
        document: Document,
        now: Instant,
    ) {
        if !self.enabled {
            return;
        }
        let due_at = now + self.debounce_delay;
        let base_name = base_name.into();

        match self.pending.iter_mut().find(|p| p.key == key) {
            Some(pending) => {
                pending.base_name = base_name;
                pending.document = document;
                pending.due_at = due_at;
                pending.superseded += 1;
                log::trace!(
                    "Auto-save: superseded pending save for {} ({} time(s))",
                    key,
                    pending.superseded
                );
            }
            None => {
                log::trace!("Auto-save: scheduled save for {}", key);
                self.pending.push(PendingSave {
                    key,
                    base_name,
                    document,
                    due_at,
                    superseded: 0,
                });
            }
        }
    }

    /// Remove and return every save whose debounce window has passed.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingSave> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_at <= now);
        self.pending = waiting;
        due
    }

    /// Remove and return the pending save for one image (force save).
    pub fn take(&mut self, key: &ImageKey) -> Option<PendingSave> {
        let index = self.pending.iter().position(|p| &p.key == key)?;
        Some(self.pending.remove(index))
    }

    /// Remove and return all pending saves regardless of their deadline.
    pub fn take_all(&mut self) -> Vec<PendingSave> {
        std::mem::take(&mut self.pending)
    }

    /// Drop the pending save for one image.
    pub fn cancel(&mut self, key: &ImageKey) -> bool {
        self.take(key).is_some()
    }

    pub fn is_pending(&self, key: &ImageKey) -> bool {
        self.pending.iter().any(|p| &p.key == key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest deadline among pending saves.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due_at).min()
    }

    /// Mark that a save completed successfully.
    pub fn mark_saved(&mut self, now: Instant) {
        self.last_save = Some(now);
        self.failures = 0;
        log::trace!("Auto-save: marked saved");
    }

    /// Mark that a save failed. Nothing is retried automatically.
    pub fn mark_save_failed(&mut self) {
        self.failures += 1;
        log::trace!("Auto-save: marked save failed ({} in a row)", self.failures);
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Set whether auto-save is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Auto-save: enabled = {}", enabled);
    }

    /// Check if auto-save is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

//! Completion polling for externally produced documents.
//!
//! After a frame is handed to the processing service, its completion is
//! detected by listing saved documents on an interval until a new base name
//! appears or the deadline passes.

use std::collections::BTreeSet;
use std::time::Duration;
use web_time::Instant;

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Not due yet, or nothing new appeared.
    Waiting,
    /// These base names appeared since the previous listing. Polling stops.
    Changed(Vec<String>),
    /// The deadline passed without a change. Polling stops.
    TimedOut,
}

/// Tracks one polling run.
#[derive(Debug, Clone)]
pub struct ChangePoller {
    previous: BTreeSet<String>,
    interval: Duration,
    deadline: Instant,
    next_poll: Instant,
    finished: bool,
}

impl ChangePoller {
    /// Start polling against `baseline`. The first poll is due immediately.
    pub fn new(
        baseline: Vec<String>,
        now: Instant,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            previous: baseline.into_iter().collect(),
            interval,
            deadline: now + timeout,
            next_poll: now,
            finished: false,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        !self.finished && now >= self.next_poll
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Compare a fresh listing with the previous one.
    ///
    /// The listing becomes the new baseline, so a document that disappears
    /// and comes back counts as new again.
    pub fn observe(&mut self, now: Instant, listing: Vec<String>) -> PollStatus {
        if self.finished {
            return PollStatus::Waiting;
        }

        let new: Vec<String> = listing
            .iter()
            .filter(|name| !self.previous.contains(*name))
            .cloned()
            .collect();
        if !new.is_empty() {
            log::info!("Polling: {} new document(s): {:?}", new.len(), new);
            self.finished = true;
            return PollStatus::Changed(new);
        }

        self.previous = listing.into_iter().collect();
        self.advance(now)
    }

    /// Record a poll whose listing could not be fetched.
    pub fn poll_failed(&mut self, now: Instant) -> PollStatus {
        log::debug!("Polling: listing failed, will retry");
        self.advance(now)
    }

    fn advance(&mut self, now: Instant) -> PollStatus {
        if now >= self.deadline {
            log::warn!("Polling: gave up waiting for new documents");
            self.finished = true;
            return PollStatus::TimedOut;
        }
        self.next_poll = now + self.interval;
        PollStatus::Waiting
    }
}

//! Self-clearing success notice.
//!
//! Each `show` bumps a generation counter and queues a clear for that
//! generation. When a queued clear comes due it only clears the notice if no
//! newer notice has been shown since; otherwise it is dropped.

use chrono::{DateTime, Duration, Utc};

/// `start` moved forward by `ms`, saturating at the end of the calendar.
pub fn after_millis(start: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingClear {
    generation: u64,
    due: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct NoticeTimer {
    generation: u64,
    message: Option<String>,
    pending: Vec<PendingClear>,
}

impl NoticeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` now and schedule its removal after `delay`.
    /// A delay past the end of the calendar never fires.
    /// Returns the generation of the new notice.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        now: DateTime<Utc>,
        delay: Duration,
    ) -> u64 {
        self.generation += 1;
        self.message = Some(message.into());
        self.pending.push(PendingClear {
            generation: self.generation,
            due: now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC),
        });
        self.generation
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clears still waiting to run, stale ones included.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Cancel the clear scheduled for `generation`. Returns whether one was
    /// pending.
    pub fn cancel(&mut self, generation: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.generation != generation);
        self.pending.len() != before
    }

    /// Hide the notice now and drop every pending clear.
    pub fn dismiss(&mut self) {
        self.message = None;
        self.pending.clear();
    }

    /// Run every clear that is due at `now`. Returns true if the visible
    /// notice was removed.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> bool {
        let mut cleared = false;
        let current = self.generation;
        self.pending.retain(|p| {
            if p.due > now {
                return true;
            }
            if p.generation == current && self.message.is_some() {
                self.message = None;
                cleared = true;
            }
            false
        });
        cleared
    }
}

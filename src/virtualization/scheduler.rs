//! Host-clocked scheduling primitives.
//!
//! Nothing here owns a timer or a paint loop. The host passes `Instant`s in
//! and polls; that keeps "at most one pending recompute" checkable without a
//! real frame clock.

use std::time::{Duration, Instant};

/// Single-pending-request guard for animation-frame work.
///
/// Requests made while one is already pending are absorbed.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: bool,
    scheduled: u64,
    absorbed: u64,
}

impl FrameScheduler {
    /// Scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for work on the next frame. Returns `true` if this call scheduled
    /// it, `false` if a request was already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.absorbed += 1;
            false
        } else {
            self.pending = true;
            self.scheduled += 1;
            true
        }
    }

    /// Consume the pending request, if any, at frame time.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// True if a request waits for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drop a pending request without running it.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Number of requests that actually scheduled a frame.
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    /// Number of requests absorbed by an already pending one.
    pub fn absorbed_count(&self) -> u64 {
        self.absorbed
    }
}

/// Rate limiter with leading and trailing edges.
///
/// The first call in a window passes immediately; later calls in the same
/// window collapse into one trailing call released by `poll_trailing`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    /// Throttle admitting at most one call per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            trailing: false,
        }
    }

    /// Change the interval. A pending trailing call keeps its old deadline.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns `true` if the call may run now.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => {
                self.trailing = true;
                false
            }
            _ => {
                self.last = Some(now);
                self.trailing = false;
                true
            }
        }
    }

    /// Returns `true` once when a suppressed call is due.
    pub fn poll_trailing(&mut self, now: Instant) -> bool {
        if !self.trailing {
            return false;
        }
        let due = self
            .last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.trailing = false;
            self.last = Some(now);
        }
        due
    }

    /// True if a trailing call is waiting.
    pub fn has_trailing(&self) -> bool {
        self.trailing
    }

    /// Drop a pending trailing call.
    pub fn cancel(&mut self) {
        self.trailing = false;
    }
}

/// Fires once after `delay` has passed without another trigger.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// Debounce firing `delay` after the last trigger.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Change the quiet window for later triggers.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// (Re)start the quiet window.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns `true` once when the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// True if a trigger has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop a pending trigger.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

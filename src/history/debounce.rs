use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct Pending<T> {
    due: Instant,
    value: T,
}

/// Single-slot deferred value: each `schedule` replaces whatever was pending and
/// restarts the quiet period, so only the latest value can ever fire.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some(Pending {
            due: now + self.quiet,
            value,
        });
    }

    /// Take the pending value if its quiet period elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.due <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Take the pending value immediately.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/debounce.rs"]
mod tests;

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Single-shot deadline used by every "flush after N ms of silence" buffer.

use std::time::Duration;
use tokio::time::Instant;

/// A re-armable single-shot deadline. See [`FlushDeadline::arm()`].
///
/// Buffers in this crate that hold ambiguous partial input (the stdin buffer and the
/// emoji reassembler) own one of these instead of a spawned timer. Only one deadline is
/// ever pending per buffer: arming again replaces the previous instant, and
/// [`disarm()`](Self::disarm) is synchronous, so there is nothing to race with.
///
/// # Integration with `tokio::select`!
///
/// ```rust,no_run
/// use std::time::Duration;
/// use r3bl_tui_input::FlushDeadline;
///
/// # async fn example(mut chunks: tokio::sync::mpsc::Receiver<String>) {
/// let mut deadline = FlushDeadline::new(Duration::from_millis(10));
/// loop {
///     tokio::select! {
///         Some(_chunk) = chunks.recv() => deadline.arm(),
///         () = deadline.sleep_until(), if deadline.is_pending() => {
///             deadline.disarm();
///             // Flush the partial input here.
///         }
///     }
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FlushDeadline {
    deadline: Option<Instant>,
    duration: Duration,
}

impl FlushDeadline {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            deadline: None,
            duration,
        }
    }

    /// Sets the deadline to `now + duration`, replacing any pending one.
    pub fn arm(&mut self) { self.deadline = Some(Instant::now() + self.duration); }

    pub fn disarm(&mut self) { self.deadline = None; }

    #[must_use]
    pub fn is_pending(&self) -> bool { self.deadline.is_some() }

    #[must_use]
    pub fn get(&self) -> Option<Instant> { self.deadline }

    #[must_use]
    pub fn duration(&self) -> Duration { self.duration }

    /// Returns `true` if a deadline is pending and `now` has reached it.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Sleeps until the deadline. Never completes when nothing is pending, so guard the
    /// `tokio::select!` branch with [`is_pending()`](Self::is_pending).
    pub async fn sleep_until(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

/// Picks the earliest of two optional deadlines.
#[must_use]
pub fn earliest_deadline(lhs: Option<Instant>, rhs: Option<Instant>) -> Option<Instant> {
    match (lhs, rhs) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_not_pending() {
        let deadline = FlushDeadline::new(Duration::from_millis(10));
        assert!(!deadline.is_pending());
        assert!(deadline.get().is_none());
        assert!(!deadline.is_due(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    #[allow(clippy::needless_return)]
    async fn test_arm_then_due_after_duration() {
        let mut deadline = FlushDeadline::new(Duration::from_millis(10));
        deadline.arm();
        assert!(deadline.is_pending());
        assert!(!deadline.is_due(Instant::now()));

        tokio::time::advance(Duration::from_millis(10)).await;
        assert!(deadline.is_due(Instant::now()));

        deadline.disarm();
        assert!(!deadline.is_due(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    #[allow(clippy::needless_return)]
    async fn test_rearm_pushes_deadline_out() {
        let mut deadline = FlushDeadline::new(Duration::from_millis(10));
        deadline.arm();
        let first = deadline.get();

        tokio::time::advance(Duration::from_millis(5)).await;
        deadline.arm();
        assert!(deadline.get() > first);

        let start = Instant::now();
        deadline.sleep_until().await;
        assert_eq!(start.elapsed(), Duration::from_millis(10));
    }

    #[test]
    fn test_earliest_deadline() {
        let now = Instant::now();
        let later = now + Duration::from_millis(5);
        assert_eq!(earliest_deadline(Some(later), Some(now)), Some(now));
        assert_eq!(earliest_deadline(None, Some(later)), Some(later));
        assert_eq!(earliest_deadline(None, None), None);
    }
}

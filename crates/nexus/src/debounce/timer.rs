use derive_more::Display;
use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies one scheduled firing. Never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("timer#{_0}")]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// One-shot timers that report back with the token they were given.
pub trait Scheduler {
    type Handle;

    fn schedule(&mut self, delay: Duration, token: TimerToken) -> Self::Handle;

    fn cancel(&mut self, handle: Self::Handle);
}

/// Virtual clock. Nothing fires until the owner asks for due timers.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), TimerToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualHandle(Duration, u64);

impl ManualScheduler {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Removes the earliest timer due at or before `until` and moves the
    /// clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, TimerToken)> {
        let mut entry = self.queue.first_entry()?;
        let (at, _) = *entry.key();
        if at > until {
            return None;
        }
        let token = entry.remove();
        self.now = self.now.max(at);
        Some((at, token))
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, delay: Duration, token: TimerToken) -> ManualHandle {
        self.seq += 1;
        let key = (self.now + delay, self.seq);
        self.queue.insert(key, token);
        ManualHandle(key.0, key.1)
    }

    fn cancel(&mut self, handle: ManualHandle) {
        self.queue.remove(&(handle.0, handle.1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut sched = ManualScheduler::default();
        sched.schedule(ms(300), TimerToken::new(1));
        sched.schedule(ms(200), TimerToken::new(2));

        assert_eq!(sched.next_deadline(), Some(ms(200)));
        assert_eq!(sched.pop_due(ms(250)), Some((ms(200), TimerToken::new(2))));
        assert_eq!(sched.now(), ms(200));
        assert_eq!(sched.pop_due(ms(250)), None);
        assert_eq!(sched.pop_due(ms(300)), Some((ms(300), TimerToken::new(1))));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_delay_counts_from_current_time() {
        let mut sched = ManualScheduler::default();
        sched.advance_to(ms(100));
        sched.schedule(ms(300), TimerToken::new(7));
        assert_eq!(sched.next_deadline(), Some(ms(400)));
    }

    #[test]
    fn test_cancel_removes_timer() {
        let mut sched = ManualScheduler::default();
        let handle = sched.schedule(ms(200), TimerToken::new(1));
        sched.cancel(handle);
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.pop_due(Duration::MAX), None);
    }

    #[test]
    fn test_clock_never_goes_back() {
        let mut sched = ManualScheduler::default();
        sched.advance_to(ms(500));
        sched.advance_to(ms(100));
        assert_eq!(sched.now(), ms(500));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TimerToken::new(3).to_string(), "timer#3");
    }
}

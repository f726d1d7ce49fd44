use crate::debounce::{Scheduler, TimerToken};
use crate::events::AppEvent;
use async_channel::Sender;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Real timers: each one is a task that sleeps, then posts
/// [`AppEvent::TimerFired`] to the event loop.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: Sender<AppEvent>,
}

impl TokioScheduler {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = AbortHandle;

    fn schedule(&mut self, delay: Duration, token: TimerToken) -> AbortHandle {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::TimerFired(token)).await;
        })
        .abort_handle()
    }

    fn cancel(&mut self, handle: AbortHandle) {
        handle.abort();
    }
}

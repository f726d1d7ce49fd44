use super::timer::{Scheduler, TimerToken};
use crate::config::TimingConfig;
use crate::registry::SectorId;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Switch(SectorId),
    Close,
}

#[derive(Debug)]
struct PendingTimer<H> {
    token: TimerToken,
    action: PendingAction,
    handle: H,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    /// Sector under the pointer right now.
    pub hovered: Option<SectorId>,
    /// Panel on screen. Lags `hovered`.
    pub active: Option<SectorId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelChange {
    pub from: Option<SectorId>,
    pub to: Option<SectorId>,
}

/// Owns [`HoverState`] and the single outstanding timer.
///
/// Every event cancels the pending timer before deciding whether to schedule
/// a new one, so a superseded timer can never apply.
#[derive(Debug)]
pub struct HoverController<H> {
    state: HoverState,
    pending: Option<PendingTimer<H>>,
    timing: TimingConfig,
    issued: u64,
}

impl<H> HoverController<H> {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            state: HoverState::default(),
            pending: None,
            timing,
            issued: 0,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn active(&self) -> Option<&SectorId> {
        self.state.active.as_ref()
    }

    pub fn hovered(&self) -> Option<&SectorId> {
        self.state.hovered.as_ref()
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref().map(|p| &p.action)
    }

    /// Applies to timers scheduled from now on.
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }

    pub fn hover_enter<S>(&mut self, id: SectorId, scheduler: &mut S) -> Option<PanelChange>
    where
        S: Scheduler<Handle = H>,
    {
        self.cancel_pending(scheduler);
        self.state.hovered = Some(id.clone());

        match self.state.active.as_ref() {
            None => self.set_active(Some(id)),
            Some(active) if *active == id => None,
            Some(_) => {
                self.schedule(PendingAction::Switch(id), self.timing.switch_delay, scheduler);
                None
            }
        }
    }

    pub fn hover_leave<S>(&mut self, scheduler: &mut S) -> Option<PanelChange>
    where
        S: Scheduler<Handle = H>,
    {
        self.cancel_pending(scheduler);
        self.state.hovered = None;
        self.schedule(PendingAction::Close, self.timing.close_delay, scheduler);
        None
    }

    /// The open panel counts as hovering its own sector.
    pub fn panel_enter<S>(&mut self, scheduler: &mut S) -> Option<PanelChange>
    where
        S: Scheduler<Handle = H>,
    {
        let active = self.state.active.clone()?;
        self.hover_enter(active, scheduler)
    }

    pub fn panel_leave<S>(&mut self, scheduler: &mut S) -> Option<PanelChange>
    where
        S: Scheduler<Handle = H>,
    {
        self.hover_leave(scheduler)
    }

    /// Applies the pending action if `token` is still the pending timer.
    pub fn fire(&mut self, token: TimerToken) -> Option<PanelChange> {
        let pending = match self.pending.take() {
            Some(p) if p.token == token => p,
            other => {
                log::debug!("Ignoring stale {}", token);
                self.pending = other;
                return None;
            }
        };

        match pending.action {
            PendingAction::Switch(id) => self.set_active(Some(id)),
            PendingAction::Close => self.set_active(None),
        }
    }

    /// Drops everything when the hovered, active or pending sector is no
    /// longer `known`. Used after the sector set is replaced.
    pub fn retain<S, F>(&mut self, known: F, scheduler: &mut S) -> Option<PanelChange>
    where
        S: Scheduler<Handle = H>,
        F: Fn(&SectorId) -> bool,
    {
        let pending_target = match self.pending_action() {
            Some(PendingAction::Switch(id)) => Some(id),
            _ => None,
        };
        let stale = [self.hovered(), self.active(), pending_target]
            .into_iter()
            .flatten()
            .any(|id| !known(id));
        if !stale {
            return None;
        }

        self.cancel_pending(scheduler);
        self.state.hovered = None;
        self.set_active(None)
    }

    fn cancel_pending<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        if let Some(pending) = self.pending.take() {
            log::debug!("Cancelling {} ({:?})", pending.token, pending.action);
            scheduler.cancel(pending.handle);
        }
    }

    fn schedule<S>(&mut self, action: PendingAction, delay: Duration, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        self.cancel_pending(scheduler);
        self.issued += 1;
        let token = TimerToken::new(self.issued);
        log::debug!("Scheduling {} in {:?}: {:?}", token, delay, action);
        let handle = scheduler.schedule(delay, token);
        self.pending = Some(PendingTimer {
            token,
            action,
            handle,
        });
    }

    fn set_active(&mut self, to: Option<SectorId>) -> Option<PanelChange> {
        if self.state.active == to {
            return None;
        }
        let from = std::mem::replace(&mut self.state.active, to.clone());
        Some(PanelChange { from, to })
    }
}

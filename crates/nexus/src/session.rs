use crate::config::TimingConfig;
use crate::debounce::{HoverController, HoverState, PanelChange, Scheduler, TimerToken};
use crate::events::HoverEvent;
use crate::registry::{PanelSide, Sector, SectorRegistry};
use crate::render::MenuView;

/// A registry, a debounce controller and the scheduler driving it.
///
/// Hover events naming sectors the registry does not know are dropped here,
/// so the controller only ever sees valid ids.
pub struct Session<S: Scheduler> {
    registry: SectorRegistry,
    controller: HoverController<S::Handle>,
    scheduler: S,
}

impl<S: Scheduler> Session<S> {
    pub fn new(registry: SectorRegistry, timing: TimingConfig, scheduler: S) -> Self {
        Self {
            registry,
            controller: HoverController::new(timing),
            scheduler,
        }
    }

    pub fn registry(&self) -> &SectorRegistry {
        &self.registry
    }

    pub fn state(&self) -> &HoverState {
        self.controller.state()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn view(&self) -> MenuView<'_> {
        MenuView::new(self.controller.hovered(), self.controller.active())
    }

    pub fn active_sector(&self) -> Option<&Sector> {
        self.controller.active().and_then(|id| self.registry.get(id))
    }

    pub fn panel_side(&self) -> PanelSide {
        self.controller
            .active()
            .map(|id| self.registry.panel_side(id))
            .unwrap_or_default()
    }

    pub fn handle_hover(&mut self, event: HoverEvent) -> Option<PanelChange> {
        let scheduler = &mut self.scheduler;
        match event {
            HoverEvent::Enter(id) => {
                if !self.registry.contains(&id) {
                    log::warn!("Ignoring hover on unknown sector '{}'", id);
                    return None;
                }
                self.controller.hover_enter(id, scheduler)
            }
            HoverEvent::Leave => self.controller.hover_leave(scheduler),
            HoverEvent::PanelEnter => self.controller.panel_enter(scheduler),
            HoverEvent::PanelLeave => self.controller.panel_leave(scheduler),
            HoverEvent::PointerMove(point) => {
                let hit = self.registry.hit_test(point).cloned();
                if hit.as_ref() == self.controller.hovered() {
                    return None;
                }
                match hit {
                    Some(id) => self.controller.hover_enter(id, scheduler),
                    None => self.controller.hover_leave(scheduler),
                }
            }
        }
    }

    pub fn handle_timer(&mut self, token: TimerToken) -> Option<PanelChange> {
        self.controller.fire(token)
    }

    /// Swaps in a new sector set, closing the menu if it no longer has the
    /// sector being shown.
    pub fn reload(&mut self, registry: SectorRegistry, timing: TimingConfig) -> Option<PanelChange> {
        self.registry = registry;
        self.controller.set_timing(timing);
        let registry = &self.registry;
        self.controller
            .retain(|id| registry.contains(id), &mut self.scheduler)
    }
}

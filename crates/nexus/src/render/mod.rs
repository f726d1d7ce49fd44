use crate::registry::SectorId;

pub mod svg;
pub mod theme;

pub use svg::render_ring;
pub use theme::ThemeColors;

pub const LABEL_OFFSET: f64 = 3.0;
pub const SUBTITLE_OFFSET: f64 = 7.0;
pub const LEADER_GAP: f64 = 15.0;
pub const LEADER_TICK: f64 = 8.0;
pub const GUIDE_OFFSET: f64 = 8.0;
pub const PANEL_MARGIN: f64 = 24.0;
pub const PANEL_LINE_HEIGHT: f64 = 22.0;
pub const PANEL_WIDTH: f64 = 200.0;

/// What the renderer needs to know about the hover state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuView<'a> {
    pub hovered: Option<&'a SectorId>,
    pub active: Option<&'a SectorId>,
}

impl<'a> MenuView<'a> {
    pub fn new(hovered: Option<&'a SectorId>, active: Option<&'a SectorId>) -> Self {
        Self { hovered, active }
    }

    pub fn is_highlighted(&self, id: &SectorId) -> bool {
        self.hovered == Some(id)
    }

    pub fn is_dimmed(&self, id: &SectorId) -> bool {
        self.hovered.is_some_and(|h| h != id)
    }
}

use super::theme::{ThemeColors, svg_color};
use super::{
    GUIDE_OFFSET, LABEL_OFFSET, LEADER_GAP, LEADER_TICK, MenuView, PANEL_LINE_HEIGHT,
    PANEL_MARGIN, PANEL_WIDTH, SUBTITLE_OFFSET,
};
use crate::registry::{PanelSide, Sector, SectorRegistry};
use palette::Srgba;
use ringpath::Wedge;
use std::fmt::{self, Write};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn paint(attr: &str, color: Srgba<f64>) -> String {
    let (hex, alpha) = svg_color(color);
    format!(r#"{attr}="{hex}" {attr}-opacity="{alpha}""#)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectorState {
    Highlighted,
    Dimmed,
    Idle,
}

impl SectorState {
    fn resolve(sector: &Sector, view: &MenuView) -> Self {
        if view.is_highlighted(&sector.id) {
            Self::Highlighted
        } else if view.is_dimmed(&sector.id) {
            Self::Dimmed
        } else {
            Self::Idle
        }
    }

    fn opacity(&self, colors: &ThemeColors) -> f64 {
        match self {
            Self::Dimmed => colors.dimmed_opacity,
            Self::Highlighted | Self::Idle => 1.0,
        }
    }

    fn fill(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Highlighted => colors.segment_active,
            Self::Dimmed | Self::Idle => colors.segment,
        }
    }

    fn stroke(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Highlighted => colors.stroke_active,
            Self::Dimmed | Self::Idle => colors.stroke,
        }
    }

    fn text(&self, colors: &ThemeColors) -> (Srgba<f64>, Srgba<f64>) {
        match self {
            Self::Highlighted => (colors.label_active, colors.label_active),
            Self::Dimmed | Self::Idle => (colors.label, colors.subtitle),
        }
    }
}

struct SectorRenderer<'a> {
    sector: &'a Sector,
    wedge: &'a Wedge,
    state: SectorState,
    side: PanelSide,
    view_box: f64,
}

impl SectorRenderer<'_> {
    fn draw(&self, out: &mut String, colors: &ThemeColors) -> fmt::Result {
        writeln!(
            out,
            r#"  <g id="sector-{}" opacity="{}">"#,
            escape(&self.sector.id),
            self.state.opacity(colors)
        )?;
        if self.state == SectorState::Highlighted {
            self.draw_leader(out, colors)?;
            self.draw_guide(out, colors)?;
        }
        self.draw_wedge(out, colors)?;
        self.draw_labels(out, colors)?;
        writeln!(out, "  </g>")
    }

    fn draw_wedge(&self, out: &mut String, colors: &ThemeColors) -> fmt::Result {
        let width = if self.state == SectorState::Highlighted { 1.5 } else { 1.0 };
        writeln!(
            out,
            r#"    <path d="{}" {} {} stroke-width="{}"/>"#,
            self.wedge.path(),
            paint("fill", self.state.fill(colors)),
            paint("stroke", self.state.stroke(colors)),
            width
        )
    }

    fn draw_guide(&self, out: &mut String, colors: &ThemeColors) -> fmt::Result {
        writeln!(
            out,
            r#"    <path class="guide" d="{}" fill="none" {} stroke-width="1"/>"#,
            self.wedge.guide(GUIDE_OFFSET),
            paint("stroke", colors.stroke_active)
        )
    }

    /// Tick beside the label plus a horizontal run to the panel's edge.
    fn draw_leader(&self, out: &mut String, colors: &ThemeColors) -> fmt::Result {
        let anchor = self.wedge.label_anchor();
        let (x, edge) = match self.side {
            PanelSide::Left => (anchor.x - LEADER_GAP, 0.0),
            PanelSide::Right => (anchor.x + LEADER_GAP, self.view_box),
        };
        let stroke = paint("stroke", colors.stroke_active);
        writeln!(
            out,
            r#"    <line x1="{x}" y1="{}" x2="{x}" y2="{}" {stroke} stroke-width="1"/>"#,
            anchor.y - LEADER_TICK,
            anchor.y + LEADER_TICK,
        )?;
        writeln!(
            out,
            r#"    <line x1="{x}" y1="{y}" x2="{edge}" y2="{y}" {stroke} stroke-width="1"/>"#,
            y = anchor.y,
        )
    }

    fn draw_labels(&self, out: &mut String, colors: &ThemeColors) -> fmt::Result {
        let anchor = self.wedge.label_anchor();
        let (label, subtitle) = self.state.text(colors);
        writeln!(
            out,
            r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" {}>{}</text>"#,
            anchor.x,
            anchor.y - LABEL_OFFSET,
            paint("fill", label),
            escape(&self.sector.label)
        )?;
        writeln!(
            out,
            r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" {}>{}</text>"#,
            anchor.x,
            anchor.y + SUBTITLE_OFFSET,
            paint("fill", subtitle),
            escape(&self.sector.subtitle)
        )
    }
}

fn draw_panel(
    out: &mut String,
    sector: &Sector,
    side: PanelSide,
    view_box: f64,
    colors: &ThemeColors,
) -> fmt::Result {
    let (x, text_anchor, left) = match side {
        PanelSide::Left => (PANEL_MARGIN, "start", 0.0),
        PanelSide::Right => (view_box - PANEL_MARGIN, "end", view_box - PANEL_WIDTH),
    };
    let mut y = view_box / 2.0 - PANEL_LINE_HEIGHT * 2.0;

    writeln!(out, r#"  <g id="panel" class="panel-{side}">"#)?;
    writeln!(
        out,
        r#"    <rect x="{left}" y="0" width="{PANEL_WIDTH}" height="{view_box}" {}/>"#,
        paint("fill", colors.panel_background)
    )?;
    let lines = [
        (escape(&sector.label), colors.label),
        (escape(&sector.subtitle), colors.label),
        (escape(&sector.description), colors.panel_text),
    ]
    .into_iter()
    .chain(
        sector
            .bullets
            .iter()
            .map(|b| (format!("&#8226; {}", escape(b)), colors.panel_text)),
    );
    for (text, color) in lines {
        writeln!(
            out,
            r#"    <text x="{x}" y="{y}" text-anchor="{text_anchor}" {}>{text}</text>"#,
            paint("fill", color)
        )?;
        y += PANEL_LINE_HEIGHT;
    }
    writeln!(out, "  </g>")
}

/// Renders the whole ring, and the side panel when one is active, as a
/// standalone SVG document.
pub fn render_ring(
    registry: &SectorRegistry,
    view: &MenuView,
    colors: &ThemeColors,
) -> Result<String, fmt::Error> {
    let view_box = registry.ring().view_box;
    let mut out = String::new();

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {view_box} {view_box}">"#
    )?;
    writeln!(
        out,
        r#"  <rect width="{view_box}" height="{view_box}" {}/>"#,
        paint("fill", colors.background)
    )?;

    for (sector, wedge) in registry.iter() {
        SectorRenderer {
            sector,
            wedge,
            state: SectorState::resolve(sector, view),
            side: registry.panel_side(&sector.id),
            view_box,
        }
        .draw(&mut out, colors)?;
    }

    if let Some(sector) = view.active.and_then(|id| registry.get(id)) {
        draw_panel(
            &mut out,
            sector,
            registry.panel_side(&sector.id),
            view_box,
            colors,
        )?;
    }

    writeln!(out, "</svg>")?;
    Ok(out)
}

use palette::Srgba;

pub struct ThemeColors {
    pub segment: Srgba<f64>,
    pub segment_active: Srgba<f64>,
    pub stroke: Srgba<f64>,
    pub stroke_active: Srgba<f64>,
    pub label: Srgba<f64>,
    pub label_active: Srgba<f64>,
    pub subtitle: Srgba<f64>,
    pub panel_background: Srgba<f64>,
    pub panel_text: Srgba<f64>,
    pub background: Srgba<f64>,
    pub dimmed_opacity: f64,
}

impl Default for ThemeColors {
    fn default() -> Self {
        let gold = Srgba::new(0.831, 0.686, 0.216, 1.0);
        let obsidian = Srgba::new(0.02, 0.02, 0.02, 1.0);
        Self {
            segment: Srgba::new(0.071, 0.063, 0.047, 1.0),
            segment_active: gold,
            stroke: Srgba::new(0.831, 0.686, 0.216, 0.6),
            stroke_active: gold,
            label: gold,
            label_active: obsidian,
            subtitle: Srgba::new(0.878, 0.878, 0.878, 0.85),
            panel_background: Srgba::new(0.02, 0.02, 0.02, 0.95),
            panel_text: Srgba::new(0.784, 0.784, 0.784, 1.0),
            background: obsidian,
            dimmed_opacity: 0.4,
        }
    }
}

/// `(#rrggbb, alpha)` for SVG `fill`/`fill-opacity` style attribute pairs.
pub fn svg_color(color: Srgba<f64>) -> (String, f64) {
    let rgb = color.color.into_format::<u8>();
    (format!("#{:x}", rgb), color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_color_hex() {
        let theme = ThemeColors::default();
        assert_eq!(svg_color(theme.segment_active), ("#d4af37".to_string(), 1.0));
        assert_eq!(svg_color(theme.stroke).1, 0.6);
        assert_eq!(svg_color(Srgba::new(0.0, 0.0, 0.0, 0.5)).0, "#000000");
    }
}

use plotters::style::RGBColor;

/// Styling for one rendered chart, passed into the renderer as a value.
/// The default is a grey "darkgrid" face with white grid lines and a ten colour palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// width, height in pixels
    pub size: (u32, u32),
    pub background: RGBColor,
    /// fill of the plotting area
    pub face: RGBColor,
    pub grid: RGBColor,
    pub font_family: String,
    pub title_size: f64,
    pub label_size: f64,
    pub line_width: u32,
    pub palette: Vec<RGBColor>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            size: (1600, 800),
            background: RGBColor(255, 255, 255),
            face: RGBColor(234, 234, 242),
            grid: RGBColor(255, 255, 255),
            font_family: "sans-serif".to_string(),
            title_size: 32.,
            label_size: 24.,
            line_width: 3,
            palette: vec![
                RGBColor(76, 114, 176),
                RGBColor(221, 132, 82),
                RGBColor(85, 168, 104),
                RGBColor(196, 78, 82),
                RGBColor(129, 114, 179),
                RGBColor(147, 120, 96),
                RGBColor(218, 139, 195),
                RGBColor(140, 140, 140),
                RGBColor(204, 185, 116),
                RGBColor(100, 181, 205),
            ],
        }
    }
}

impl Theme {
    /// colour of the i-th series, cycling through the palette
    pub fn series_color(&self, i: usize) -> RGBColor {
        if self.palette.is_empty() {
            return RGBColor(0, 0, 0);
        }
        self.palette[i % self.palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        let theme = Theme::default();
        assert_eq!(theme.series_color(0), theme.series_color(10));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn empty_palette_falls_back_to_black() {
        let theme = Theme {
            palette: Vec::new(),
            ..Theme::default()
        };
        assert_eq!(theme.series_color(3), RGBColor(0, 0, 0));
    }
}

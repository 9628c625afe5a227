use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;
use crate::text::measure_text;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Plot area of a panel whose cell starts at `cell` and spans the
    /// configured panel size, leaving room for a title of `title_lines`
    /// lines, tick labels and axis labels.
    pub fn auto(cell: (f64, f64), title_lines: usize, y_axis: &Axis, x_axis: &Axis, config: &VizConfig) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
        let tick_gap = config.axes.tick_length + 4.0;

        let mut left = 10.0;
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        left += max_tick_w + tick_gap;
        if !y_axis.label.is_empty() {
            left += config.font.label_size + 8.0;
        }

        let mut bottom = 10.0 + config.font.tick_size + tick_gap;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size + 8.0;
        }

        let top = 8.0 + title_lines as f64 * config.font.title_size * 1.25 + 6.0;
        let right = 12.0;

        let width = config.figure.panel_width - left - right;
        let height = config.figure.panel_height - top - bottom;
        Self { left: cell.0 + left, top: cell.1 + top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Horizontal position of the rotated y axis label.
    pub fn y_label_x(&self, y_axis: &Axis, config: &VizConfig) -> f64 {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        self.left - config.axes.tick_length - 4.0 - max_tick_w - 6.0 - config.font.label_size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_fits_inside_cell() {
        let config = VizConfig::default();
        let x = Axis::auto_linear(0.0, 12.0, 6, 0.0).with_label("Years of schooling");
        let y = Axis::auto_linear(6.0, 11.0, 6, 0.0).with_label("Log GDP per capita");
        let area = PlotArea::auto((100.0, 0.0), 2, &y, &x, &config);
        assert!(area.left > 100.0);
        assert!(area.right() < 100.0 + config.figure.panel_width);
        assert!(area.bottom() < config.figure.panel_height);
        assert!(area.top > 2.0 * config.font.title_size);
        let label_x = area.y_label_x(&y, &config);
        assert!(label_x > 100.0 && label_x < area.left);
    }
}

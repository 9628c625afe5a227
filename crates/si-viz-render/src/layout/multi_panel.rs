use crate::config::FigureConfig;

/// Panels of equal size laid out left to right.
#[derive(Debug, Clone)]
pub struct PanelRow {
    /// Top-left corner of each panel cell.
    pub cells: Vec<(f64, f64)>,
    pub total_width: f64,
    pub total_height: f64,
}

impl PanelRow {
    pub fn new(n_panels: usize, figure: &FigureConfig) -> Self {
        let n = n_panels.max(1);
        let cells = (0..n)
            .map(|i| (i as f64 * (figure.panel_width + figure.panel_gap), 0.0))
            .collect();
        let total_width = n as f64 * figure.panel_width + (n - 1) as f64 * figure.panel_gap;
        Self { cells, total_width, total_height: figure.panel_height }
    }
}

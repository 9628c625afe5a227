use si_viz::{FigureArtifact, ScatterFitArtifact};

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::layout::multi_panel::PanelRow;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;
use crate::text::wrap_text;
use crate::{RenderError, Result};

/// CSS class of the per-point text annotations.
pub const POINT_LABEL_CLASS: &str = "point-label";

/// Render a single scatter panel.
pub fn render_panel(art: &ScatterFitArtifact, config: &VizConfig) -> Result<String> {
    let mut canvas = Canvas::new(config.figure.panel_width, config.figure.panel_height)?;
    draw_panel(&mut canvas, (0.0, 0.0), art, config)?;
    canvas.finish_svg()
}

/// Render all panels of a figure in one row.
pub fn render_figure(fig: &FigureArtifact, config: &VizConfig) -> Result<String> {
    if fig.panels.is_empty() {
        return Err(RenderError::Layout(format!("figure '{}' has no panels", fig.id)));
    }
    let row = PanelRow::new(fig.panels.len(), &config.figure);
    let mut canvas = Canvas::new(row.total_width, row.total_height)?;
    for (panel, cell) in fig.panels.iter().zip(&row.cells) {
        draw_panel(&mut canvas, *cell, panel, config)?;
    }
    canvas.finish_svg()
}

fn validate(art: &ScatterFitArtifact) -> Result<()> {
    if let Some(p) = art.points.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(RenderError::Layout(format!(
            "panel '{}': non-finite point {} ({}, {})",
            art.title, p.label, p.x, p.y
        )));
    }
    if art.fit.x.len() != art.fit.y.len() {
        return Err(RenderError::Layout(format!(
            "panel '{}': fit line has {} x and {} y values",
            art.title,
            art.fit.x.len(),
            art.fit.y.len()
        )));
    }
    Ok(())
}

/// Draw one panel into the cell whose top-left corner is `cell`.
fn draw_panel(canvas: &mut Canvas, cell: (f64, f64), art: &ScatterFitArtifact, config: &VizConfig) -> Result<()> {
    validate(art)?;
    let xs: Vec<f64> = art.points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = art.points.iter().map(|p| p.y).collect();
    ys.extend(art.fit.y.iter().copied().filter(|v| v.is_finite()));

    let x_axis = Axis::for_data(&xs, config.axes.target_ticks, config.axes.padding).with_label(&art.x_label);
    let y_axis = Axis::for_data(&ys, config.axes.target_ticks, config.axes.padding).with_label(&art.y_label);

    let title_style = TextStyle {
        size: config.font.title_size,
        bold: true,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    let title_lines = wrap_text(&art.title, &title_style, config.figure.panel_width - 20.0);

    let area = PlotArea::auto(cell, title_lines.len(), &y_axis, &x_axis, config);
    let center_x = cell.0 + config.figure.panel_width / 2.0;
    for (i, line) in title_lines.iter().enumerate() {
        let y = cell.1 + 8.0 + i as f64 * config.font.title_size * 1.25;
        canvas.text(center_x, y, line, &title_style);
    }

    draw_axes(canvas, &area, &x_axis, &y_axis, config);

    let to_px = |x: f64, y: f64| {
        (x_axis.data_to_pixel(x, area.left, area.right()), y_axis.data_to_pixel(y, area.bottom(), area.top))
    };

    canvas.push_clip(area.left, area.top, area.width, area.height);

    let marker = MarkerStyle::new(config.scatter.marker_size, config.colors.marker);
    for p in &art.points {
        let (px, py) = to_px(p.x, p.y);
        canvas.marker(px, py, &marker);
    }

    let line: Vec<(f64, f64)> = art.fit.x.iter().zip(&art.fit.y).map(|(&x, &y)| to_px(x, y)).collect();
    if line.len() >= 2 {
        let dash = Dash::from_name(&config.scatter.fit_line_dash).unwrap_or_default();
        let style = LineStyle::solid(config.colors.fit_line, config.scatter.fit_line_width).with_dash(dash);
        canvas.polyline(&line, &style);
    }

    if config.scatter.annotate {
        let label_style = TextStyle {
            size: config.font.annotation_size,
            color: config.colors.annotation,
            baseline: TextBaseline::Central,
            ..Default::default()
        };
        let offset = config.scatter.marker_size + 1.5;
        for p in &art.points {
            let (px, py) = to_px(p.x, p.y);
            canvas.text_with_class(px + offset, py - offset, &p.label, &label_style, POINT_LABEL_CLASS);
        }
    }

    canvas.pop_clip();
    Ok(())
}

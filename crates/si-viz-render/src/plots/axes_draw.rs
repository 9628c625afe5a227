use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw a box frame with ticks, optional grid, tick labels and axis labels.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &VizConfig) {
    let frame_color = config.colors.frame;
    let frame_style = LineStyle::solid(frame_color, 0.8);
    let tick_line = LineStyle::solid(frame_color, 0.6);
    let grid_style =
        LineStyle::solid(config.grid.color.with_alpha(config.grid.alpha), 0.5).with_dash(Dash::Dashed);

    let inward = config.axes.tick_direction == "in";
    let tl = if inward { -config.axes.tick_length } else { config.axes.tick_length };

    canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);

    let x_tick_label = TextStyle {
        size: config.font.tick_size,
        color: frame_color,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for (val, label) in x_axis.tick_positions.iter().zip(&x_axis.tick_labels) {
        let px = x_axis.data_to_pixel(*val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_style);
        }
        canvas.line(px, area.bottom(), px, area.bottom() + tl, &tick_line);
        canvas.text(px, area.bottom() + tl.max(0.0) + 4.0, label, &x_tick_label);
    }

    let y_tick_label = TextStyle {
        size: config.font.tick_size,
        color: frame_color,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    for (val, label) in y_axis.tick_positions.iter().zip(&y_axis.tick_labels) {
        let py = y_axis.data_to_pixel(*val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_style);
        }
        canvas.line(area.left, py, area.left - tl, py, &tick_line);
        canvas.text(area.left - tl.max(0.0) - 4.0, py, label, &y_tick_label);
    }

    let label_style = TextStyle {
        size: config.font.label_size,
        color: frame_color,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    if !x_axis.label.is_empty() {
        let label_y = area.bottom() + tl.max(0.0) + config.font.tick_size + config.font.label_size + 10.0;
        canvas.text(area.left + area.width / 2.0, label_y, &x_axis.label, &label_style);
    }
    if !y_axis.label.is_empty() {
        let label_x = area.y_label_x(y_axis, config);
        let label_y = area.top + area.height / 2.0;
        canvas.text_rotated(label_x, label_y, &y_axis.label, &label_style, -90.0);
    }
}

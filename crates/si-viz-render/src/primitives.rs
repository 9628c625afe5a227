//! Styles used by scatter panels: frame and fit-line strokes, point markers,
//! titles and annotations.

use crate::color::Color;

/// Dash pattern of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl Dash {
    /// Parse the names accepted in `scatter.fit_line_dash`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "solid" => Some(Dash::Solid),
            "dashed" => Some(Dash::Dashed),
            "dotted" => Some(Dash::Dotted),
            _ => None,
        }
    }

    /// `stroke-dasharray` value; solid strokes have none.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            Dash::Solid => None,
            Dash::Dashed => Some("6 3"),
            Dash::Dotted => Some("2 2"),
        }
    }
}

/// Stroke of the panel frame, ticks, grid and fitted line.
#[derive(Debug, Clone)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Dash,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Solid }
    }

    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }
}

/// Filled circle drawn for each observation.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: Color,
    /// Width of the outline, drawn in the fill color.
    pub outline_width: f64,
}

impl MarkerStyle {
    pub fn new(radius: f64, color: Color) -> Self {
        Self { radius, color, outline_width: 0.5 }
    }
}

/// Font of panel titles, axis and tick labels, and point annotations.
///
/// Defaults to 10pt regular text anchored at its start on the alphabetic
/// baseline.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::BLACK,
            bold: false,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

/// Horizontal alignment relative to the text's x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Vertical alignment relative to the text's y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn svg(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

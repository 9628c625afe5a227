use std::fmt::Write as FmtWrite;

use crate::primitives::*;

/// Element queued until [`Canvas::finish_svg`]; clipped ones are nested in a `Group`.
#[derive(Debug, Clone)]
enum SvgElement {
    Line { x1: f64, y1: f64, x2: f64, y2: f64, style: LineStyle },
    Polyline { points: Vec<(f64, f64)>, style: LineStyle },
    Text { x: f64, y: f64, content: String, style: TextStyle, rotate: Option<f64>, class: Option<&'static str> },
    Circle { cx: f64, cy: f64, marker: MarkerStyle },
    Group { clip_id: String, children: Vec<SvgElement> },
}

/// SVG page for one figure: point coordinates, origin at the top left.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip: Option<(String, Vec<SvgElement>)>,
    next_clip_id: usize,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(crate::RenderError::Layout(format!("invalid canvas size {width}x{height}")));
        }
        Ok(Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
            clip: None,
            next_clip_id: 0,
        })
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        self.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push_text(x, y, content, style, None, None);
    }

    /// Text tagged with a CSS class, so consumers can select e.g. point annotations.
    pub fn text_with_class(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, class: &'static str) {
        self.push_text(x, y, content, style, None, Some(class));
    }

    /// Text rotated by `angle` degrees around its anchor (y axis labels).
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push_text(x, y, content, style, Some(angle), None);
    }

    /// One observation.
    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerStyle) {
        self.push(SvgElement::Circle { cx: x, cy: y, marker: marker.clone() });
    }

    fn push_text(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        style: &TextStyle,
        rotate: Option<f64>,
        class: Option<&'static str>,
    ) {
        self.push(SvgElement::Text { x, y, content: content.to_string(), style: style.clone(), rotate, class });
    }

    /// Clip everything drawn until [`Canvas::pop_clip`] to the given rectangle.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        self.pop_clip();
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.clip = Some((id.clone(), Vec::new()));
        id
    }

    pub fn pop_clip(&mut self) {
        if let Some((clip_id, children)) = self.clip.take() {
            self.elements.push(SvgElement::Group { clip_id, children });
        }
    }

    fn push(&mut self, elem: SvgElement) {
        match &mut self.clip {
            Some((_, children)) => children.push(elem),
            None => self.elements.push(elem),
        }
    }

    pub fn finish_svg(mut self) -> crate::Result<String> {
        self.pop_clip();
        let mut out = String::with_capacity(32 * 1024);
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height,
        ));

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                out.push_str(d);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }

        out.push_str(&format!(
            "<rect width=\"{}\" height=\"{}\" fill=\"white\" />\n",
            self.width, self.height
        ));

        for elem in &self.elements {
            write_element(&mut out, elem)?;
        }

        out.push_str("</svg>\n");
        Ok(out)
    }
}

fn write_element(out: &mut String, elem: &SvgElement) -> std::fmt::Result {
    match elem {
        SvgElement::Line { x1, y1, x2, y2, style } => {
            write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            write_line_attrs(out, style)?;
            out.push_str(" />\n");
        }
        SvgElement::Polyline { points, style } => {
            out.push_str(r#"<polyline points=""#);
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write!(out, "{x:.2},{y:.2}")?;
            }
            out.push_str(r#"" fill="none""#);
            write_line_attrs(out, style)?;
            out.push_str(" />\n");
        }
        SvgElement::Text { x, y, content, style, rotate, class } => {
            write!(out, r#"<text x="{x:.2}" y="{y:.2}""#)?;
            if let Some(class) = class {
                write!(out, r#" class="{class}""#)?;
            }
            write!(out, r#" font-family="Helvetica, Arial, sans-serif" font-size="{:.1}""#, style.size)?;
            write!(out, r#" fill="{}""#, style.color.to_svg_fill())?;
            write!(out, r#" text-anchor="{}""#, style.anchor.svg())?;
            write!(out, r#" dominant-baseline="{}""#, style.baseline.svg())?;
            if style.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if let Some(angle) = rotate {
                write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
            }
            out.push('>');
            out.push_str(&escape_xml(content));
            out.push_str("</text>\n");
        }
        SvgElement::Circle { cx, cy, marker } => {
            let color = marker.color.to_svg_fill();
            writeln!(
                out,
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{:.2}" fill="{color}" stroke="{color}" stroke-width="{:.2}" />"#,
                marker.radius, marker.outline_width
            )?;
        }
        SvgElement::Group { clip_id, children } => {
            writeln!(out, r#"<g clip-path="url(#{clip_id})">"#)?;
            for child in children {
                write_element(out, child)?;
            }
            out.push_str("</g>\n");
        }
    }
    Ok(())
}

pub(crate) fn escape_xml(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_line_attrs(out: &mut String, style: &LineStyle) -> std::fmt::Result {
    write!(out, r#" stroke="{}""#, style.color.to_svg_fill())?;
    write!(out, r#" stroke-width="{:.2}""#, style.width)?;
    if let Some(dash) = style.dash.dasharray() {
        write!(out, r#" stroke-dasharray="{dash}""#)?;
    }
    Ok(())
}

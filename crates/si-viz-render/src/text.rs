use crate::primitives::TextStyle;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Approximate advance of one glyph in ems for a sans-serif face.
fn advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' | ' ' => 0.34,
        'm' | 'w' => 0.86,
        'M' | 'W' => 0.92,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii_uppercase() => 0.68,
        _ => 0.55,
    }
}

/// Estimate the rendered extent of `text` without loading font files.
pub fn measure_text(text: &str, style: &TextStyle) -> TextMetrics {
    let bold = if style.bold { 1.06 } else { 1.0 };
    let ems: f64 = text.chars().map(advance_em).sum();
    TextMetrics {
        width: ems * style.size * bold,
        height: style.size * 1.2,
        ascent: style.size * 0.93,
    }
}

/// Greedy word wrap to `max_width`. A single word wider than the limit gets
/// its own line.
pub fn wrap_text(text: &str, style: &TextStyle, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate =
            if current.is_empty() { word.to_string() } else { format!("{current} {word}") };
        if !current.is_empty() && measure_text(&candidate, style).width > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wider_for_longer_text() {
        let style = TextStyle { size: 12.0, ..Default::default() };
        let a = measure_text("Hello", &style);
        let b = measure_text("Hello World", &style);
        assert!(a.width > 20.0);
        assert!(b.width > a.width);
        assert!(a.height > 12.0);
    }

    #[test]
    fn wraps_on_words() {
        let style = TextStyle { size: 10.0, ..Default::default() };
        let text = "Relationship between Log GDP per capita and years of schooling";
        let lines = wrap_text(text, &style, 120.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in &lines[..lines.len() - 1] {
            assert!(measure_text(line, &style).width <= 120.0);
        }
        assert!(wrap_text("", &style, 10.0).is_empty());
    }
}

use serde::Deserialize;

use crate::color::Color;
use crate::primitives::Dash;

/// Styling of scatter figures, read from a YAML file; absent keys keep defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub colors: ColorsConfig,
    pub scatter: ScatterConfig,
    pub output: OutputConfig,
}

/// Size of one panel; multi-panel figures lay panels out in a row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub panel_width: f64,
    pub panel_height: f64,
    pub panel_gap: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            panel_width: 432.0,  // 6" * 72
            panel_height: 432.0,
            panel_gap: 12.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub annotation_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { title_size: 11.0, label_size: 10.0, tick_size: 8.5, annotation_size: 6.5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub tick_length: f64,
    pub target_ticks: usize,
    /// Fraction of the data range added on each side before tick rounding.
    pub padding: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self { tick_direction: "out".into(), tick_length: 4.0, target_ticks: 6, padding: 0.04 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::hex("#CBD5E1"), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub marker: Color,
    pub fit_line: Color,
    pub annotation: Color,
    pub frame: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            marker: Color::hex("#1F77B4"),
            fit_line: Color::rgb(255, 0, 0),
            annotation: Color::hex("#111827"),
            frame: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub marker_size: f64,
    pub fit_line_width: f64,
    /// `"solid"`, `"dashed"` or `"dotted"`.
    pub fit_line_dash: String,
    pub annotate: bool,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self { marker_size: 2.5, fit_line_width: 1.2, fit_line_dash: "dotted".into(), annotate: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into() }
    }
}

/// Resolve a VizConfig from an optional YAML string; absent keys keep defaults.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let config = match user_yaml {
        None => VizConfig::default(),
        Some(yaml) if yaml.trim().is_empty() => VizConfig::default(),
        Some(yaml) => serde_yaml_ng::from_str(yaml)
            .map_err(|e| crate::RenderError::Config(e.to_string()))?,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &VizConfig) -> crate::Result<()> {
    let fig = &config.figure;
    if !(fig.panel_width > 0.0 && fig.panel_height > 0.0) {
        return Err(crate::RenderError::Config(format!(
            "panel size must be positive, got {}x{}",
            fig.panel_width, fig.panel_height
        )));
    }
    if fig.panel_gap < 0.0 {
        return Err(crate::RenderError::Config("panel_gap must be non-negative".into()));
    }
    match Dash::from_name(&config.scatter.fit_line_dash) {
        Some(_) => Ok(()),
        None => Err(crate::RenderError::Config(format!(
            "unknown fit_line_dash '{}'",
            config.scatter.fit_line_dash
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_keep_defaults() {
        let cfg = resolve_config(Some(
            "figure:\n  panel_width: 300\nscatter:\n  annotate: false\ncolors:\n  fit_line: \"#00ff00\"\n",
        ))
        .unwrap();
        assert_eq!(cfg.figure.panel_width, 300.0);
        assert_eq!(cfg.figure.panel_height, 432.0);
        assert!(!cfg.scatter.annotate);
        assert_eq!(cfg.scatter.fit_line_dash, "dotted");
        assert_eq!(cfg.colors.fit_line, Color::rgb(0, 255, 0));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(resolve_config(Some("figure:\n  panel_width: 0\n")).is_err());
        assert!(resolve_config(Some("scatter:\n  fit_line_dash: wavy\n")).is_err());
        assert!(resolve_config(Some("figure: 3\n")).is_err());
        assert!(resolve_config(None).is_ok());
    }
}

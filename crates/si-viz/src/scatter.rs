//! Scatter-with-fitted-line artifacts (numbers-first).

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use si_core::{Error, FittedModel, Result};
use si_inference::{INTERCEPT, OlsResult};

/// Schema tag of a single panel.
pub const SCATTER_FIT_SCHEMA: &str = "scatter_fit_v0";
/// Schema tag of a multi-panel figure.
pub const FIGURE_SCHEMA: &str = "figure_v0";

/// One labelled observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Annotation drawn next to the marker (entity code).
    pub label: String,
    /// Fitted value at `x`.
    pub fitted: f64,
}

/// Straight fitted line `y = intercept + slope * x` over the data range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitLine {
    /// Intercept.
    pub intercept: f64,
    /// Slope.
    pub slope: f64,
    /// Line x-values (ascending).
    pub x: Vec<f64>,
    /// Line y-values aligned with `x`.
    pub y: Vec<f64>,
}

/// A single scatter panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterFitArtifact {
    /// Schema tag, [`SCATTER_FIT_SCHEMA`].
    pub schema_version: String,
    /// Panel title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Observations in input row order.
    pub points: Vec<ScatterPoint>,
    /// Fitted regression line.
    pub fit: FitLine,
    /// R² of the fit.
    pub r_squared: f64,
}

/// Figure metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureMeta {
    /// Producing tool.
    pub tool: String,
    /// Tool version.
    pub tool_version: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_unix_ms: u128,
}

/// Several scatter panels drawn side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureArtifact {
    /// Schema tag, [`FIGURE_SCHEMA`].
    pub schema_version: String,
    /// Metadata.
    pub meta: FigureMeta,
    /// Figure identifier (e.g. `"figure1"`).
    pub id: String,
    /// Panels, left to right.
    pub panels: Vec<ScatterFitArtifact>,
}

/// Axis and title text for one panel.
#[derive(Debug, Clone, Copy)]
pub struct PanelText<'a> {
    /// Panel title.
    pub title: &'a str,
    /// Horizontal axis label.
    pub x_label: &'a str,
    /// Vertical axis label.
    pub y_label: &'a str,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Computation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

/// Build a panel from the rows of a bivariate fit `y ~ 1 + x`.
///
/// `x`, `y` and `labels` must be the rows the fit was estimated on, in the
/// same order; point `i` keeps label `i`.
pub fn scatter_fit_artifact(
    text: PanelText<'_>,
    x: &[f64],
    y: &[f64],
    labels: &[String],
    fit: &OlsResult,
    regressor: &str,
) -> Result<ScatterFitArtifact> {
    let n = x.len();
    if y.len() != n || labels.len() != n || fit.fitted.len() != n {
        return Err(Error::Validation(format!(
            "scatter length mismatch: x={} y={} labels={} fitted={}",
            n,
            y.len(),
            labels.len(),
            fit.fitted.len()
        )));
    }
    let (slope, _, _) = fit
        .coefficient(regressor)
        .ok_or_else(|| Error::Validation(format!("fit has no regressor '{regressor}'")))?;
    let intercept = fit.coefficient(INTERCEPT).map_or(0.0, |(b, _, _)| b);

    let points = (0..n)
        .map(|i| ScatterPoint { x: x[i], y: y[i], label: labels[i].clone(), fitted: fit.fitted[i] })
        .collect();

    let mut line_x = x.to_vec();
    line_x.sort_by(f64::total_cmp);
    line_x.dedup();
    let line_y = line_x.iter().map(|v| intercept + slope * v).collect();

    Ok(ScatterFitArtifact {
        schema_version: SCATTER_FIT_SCHEMA.to_string(),
        title: text.title.to_string(),
        x_label: text.x_label.to_string(),
        y_label: text.y_label.to_string(),
        points,
        fit: FitLine { intercept, slope, x: line_x, y: line_y },
        r_squared: fit.r_squared,
    })
}

/// Wrap panels into a figure.
pub fn figure_artifact(id: &str, panels: Vec<ScatterFitArtifact>) -> Result<FigureArtifact> {
    if panels.is_empty() {
        return Err(Error::Validation("figure needs at least one panel".into()));
    }
    Ok(FigureArtifact {
        schema_version: FIGURE_SCHEMA.to_string(),
        meta: FigureMeta {
            tool: "schoolinst".to_string(),
            tool_version: si_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
        },
        id: id.to_string(),
        panels,
    })
}

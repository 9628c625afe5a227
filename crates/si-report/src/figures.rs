//! Figure 1: bivariate scatter panels with fitted lines.

use si_core::{CovarianceType, Frame, Result};
use si_inference::{Design, ols_fit};
use si_viz::{FigureArtifact, PanelText, ScatterFitArtifact, figure_artifact, scatter_fit_artifact};

use crate::labels::VariableCatalogue;

/// `(y, x, title)` of each panel, left to right.
const PANELS: [(&str, &str, &str); 3] = [
    ("logpgdp05", "tyr05_n", "Figure 1-A : Relationship between Log GDP per capita and years of schooling"),
    ("logpgdp05", "ruleoflaw", "Figure 1-B: Relationship between Log GDP per capita and the rule of law index"),
    ("ruleoflaw", "tyr05_n", "Figure 1-C : Relationship between rule of law and years of schooling"),
];

/// Scatter panel of `y` against `x` on the rows of `view`, labelled by `label_col`.
pub fn scatter_panel(view: &Frame, y: &str, x: &str, label_col: &str, title: &str) -> Result<ScatterFitArtifact> {
    let labels = VariableCatalogue::standard();
    let xs = view.dense(x)?;
    let ys = view.dense(y)?;
    let codes = view.labels(label_col)?;
    let design = Design::from_columns(view.n_rows(), vec![(x.to_string(), xs.clone())])?.with_intercept();
    let fit = ols_fit(&ys, &design, y, CovarianceType::HC3)?;
    let text = PanelText { title, x_label: labels.label(x), y_label: labels.label(y) };
    scatter_fit_artifact(text, &xs, &ys, &codes, &fit, x)
}

/// The three panels of figure 1 from the (corrected) country table.
///
/// All panels share one view: rows with schooling, income and rule of law
/// observed, so point `i` carries the same entity code in every panel.
pub fn figure1(country: &Frame) -> Result<FigureArtifact> {
    let view = country.complete_cases(&["tyr05_n", "logpgdp05", "ruleoflaw"])?;
    let panels = PANELS
        .iter()
        .map(|(y, x, title)| scatter_panel(&view, y, x, "code", title))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(rows = view.n_rows(), "built figure1");
    figure_artifact("figure1", panels)
}

//! Side-by-side comparison tables of fitted models.
//!
//! Works over any [`FittedModel`]; OLS, two-step and k-class IV fits go
//! through the same code. Everything a call can toggle lives in
//! [`TableOptions`]; number formatting lives in [`TableStyle`].

use serde::{Deserialize, Serialize};
use si_core::{Error, FittedModel, OverIdTest, Result};

use crate::labels::VariableCatalogue;
use crate::table::{HeaderCell, RowKind, Table};

/// Label of the over-identification row.
pub const OVERID_ROW: &str = "Over-identification test (p-value)";

/// p-value thresholds for one, two and three stars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarLevels {
    pub one: f64,
    pub two: f64,
    pub three: f64,
}

impl Default for StarLevels {
    fn default() -> Self {
        Self { one: 0.1, two: 0.05, three: 0.01 }
    }
}

/// Number formatting of comparison tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    /// Decimals of estimates, standard errors and fit statistics.
    pub digits: usize,
    /// Significance thresholds.
    pub stars: StarLevels,
    /// Decimals of the over-identification p-value.
    pub overid_digits: usize,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self { digits: 3, stars: StarLevels::default(), overid_digits: 2 }
    }
}

impl TableStyle {
    /// Parse a YAML document; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let style: TableStyle = serde_yaml_ng::from_str(yaml)
            .map_err(|e| Error::Validation(format!("invalid table style: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    /// Star thresholds must satisfy `0 < three < two < one < 1`.
    pub fn validate(&self) -> Result<()> {
        let s = self.stars;
        if !(0.0 < s.three && s.three < s.two && s.two < s.one && s.one < 1.0) {
            return Err(Error::Validation(format!(
                "star levels must satisfy 0 < three < two < one < 1, got {} / {} / {}",
                s.one, s.two, s.three
            )));
        }
        Ok(())
    }
}

/// Significance marker for a two-sided p-value.
pub fn significance_stars(p: f64, levels: &StarLevels) -> &'static str {
    if p < levels.three {
        "***"
    } else if p < levels.two {
        "**"
    } else if p < levels.one {
        "*"
    } else {
        ""
    }
}

/// Per-call layout of a comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub title: Option<String>,
    /// Header spanning every column.
    pub dependent_header: Option<String>,
    /// Column groups `(label, span)`; spans must sum to the model count.
    pub column_groups: Vec<(String, usize)>,
    /// Covariates to display, in order. Absent covariates render blank.
    pub covariate_order: Vec<String>,
    pub show_std_errors: bool,
    pub show_estimator: bool,
    pub show_cov_type: bool,
    pub show_n: bool,
    pub show_r2: bool,
    pub show_adj_r2: bool,
    pub show_residual_se: bool,
    pub show_f_stat: bool,
    pub show_overid: bool,
    /// Extra labelled rows; one cell per model.
    pub extra_rows: Vec<(String, Vec<String>)>,
    pub notes: Vec<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            title: None,
            dependent_header: None,
            column_groups: Vec::new(),
            covariate_order: Vec::new(),
            show_std_errors: true,
            show_estimator: false,
            show_cov_type: false,
            show_n: true,
            show_r2: true,
            show_adj_r2: true,
            show_residual_se: true,
            show_f_stat: true,
            show_overid: false,
            extra_rows: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl TableOptions {
    /// Layout of regression tables with the standard fit statistics.
    pub fn regression<S: AsRef<str>>(covariates: &[S]) -> Self {
        Self { covariate_order: covariates.iter().map(|c| c.as_ref().to_string()).collect(), ..Self::default() }
    }

    /// Layout of IV model comparisons: estimator, covariance, observations,
    /// R² and over-identification.
    pub fn iv_comparison<S: AsRef<str>>(covariates: &[S]) -> Self {
        Self {
            show_estimator: true,
            show_cov_type: true,
            show_adj_r2: false,
            show_residual_se: false,
            show_f_stat: false,
            show_overid: true,
            ..Self::regression(covariates)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_dependent_header(mut self, header: impl Into<String>) -> Self {
        self.dependent_header = Some(header.into());
        self
    }

    pub fn with_column_group(mut self, label: impl Into<String>, span: usize) -> Self {
        self.column_groups.push((label.into(), span));
        self
    }

    pub fn with_extra_row(mut self, label: impl Into<String>, cells: Vec<String>) -> Self {
        self.extra_rows.push((label.into(), cells));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Drop every fit statistic row.
    pub fn without_fit_statistics(self) -> Self {
        Self {
            show_n: false,
            show_r2: false,
            show_adj_r2: false,
            show_residual_se: false,
            show_f_stat: false,
            ..self
        }
    }
}

fn fixed(v: f64, digits: usize) -> String {
    if v.is_finite() { format!("{v:.digits$}") } else { String::new() }
}

/// Over-identification p-value cell: the rounded p-value, `N/A` when the
/// model is exactly identified, blank when the estimator has no such test.
pub fn overid_cell(test: Option<OverIdTest>, digits: usize) -> String {
    match test {
        Some(OverIdTest::Test { p_value, .. }) => fixed(p_value, digits),
        Some(OverIdTest::NotApplicable) => "N/A".to_string(),
        None => String::new(),
    }
}

/// Assemble a comparison table, one column per model, in input order.
pub fn comparison_table<M: FittedModel>(
    models: &[M],
    options: &TableOptions,
    style: &TableStyle,
    catalogue: &VariableCatalogue,
) -> Result<Table> {
    if models.is_empty() {
        return Err(Error::Validation("comparison table needs at least one model".into()));
    }
    let n = models.len();
    let d = style.digits;
    let mut table = Table::new((1..=n).map(|i| format!("({i})")).collect());
    table.title = options.title.clone();

    if let Some(header) = &options.dependent_header {
        table.push_header(vec![HeaderCell { label: header.clone(), span: n }])?;
    }
    if !options.column_groups.is_empty() {
        let cells = options
            .column_groups
            .iter()
            .map(|(label, span)| HeaderCell { label: label.clone(), span: *span })
            .collect();
        table.push_header(cells)?;
    }

    for name in &options.covariate_order {
        let mut est = Vec::with_capacity(n);
        let mut se = Vec::with_capacity(n);
        for m in models {
            match m.coefficient(name) {
                Some((b, s, p)) => {
                    est.push(format!("{}{}", fixed(b, d), significance_stars(p, &style.stars)));
                    se.push(if s.is_finite() { format!("({})", fixed(s, d)) } else { String::new() });
                }
                None => {
                    est.push(String::new());
                    se.push(String::new());
                }
            }
        }
        table.push_row(catalogue.label(name), RowKind::Coefficient, est)?;
        if options.show_std_errors {
            table.push_row("", RowKind::StdError, se)?;
        }
    }

    table.begin_statistics();
    let row = |f: fn(&M, &TableStyle) -> String| models.iter().map(|m| f(m, style)).collect::<Vec<_>>();
    if options.show_estimator {
        table.push_row("Estimator", RowKind::Statistic, row(|m, _| m.estimator_label().to_string()))?;
    }
    if options.show_cov_type {
        table.push_row("Cov. Est.", RowKind::Statistic, row(|m, _| m.covariance_label().to_string()))?;
    }
    for (label, cells) in &options.extra_rows {
        table.push_row(label.clone(), RowKind::Statistic, cells.clone())?;
    }
    if options.show_overid {
        table.push_row(OVERID_ROW, RowKind::Statistic, row(|m, s| overid_cell(m.overid(), s.overid_digits)))?;
    }
    if options.show_n {
        table.push_row("Observations", RowKind::Statistic, row(|m, _| m.n_obs().to_string()))?;
    }
    if options.show_r2 {
        table.push_row("R²", RowKind::Statistic, row(|m, s| fixed(m.r_squared(), s.digits)))?;
    }
    if options.show_adj_r2 {
        table.push_row("Adjusted R²", RowKind::Statistic, row(|m, s| fixed(m.adj_r_squared(), s.digits)))?;
    }
    if options.show_residual_se {
        let cells = row(|m, s| m.residual_std_error().map_or_else(String::new, |v| fixed(v, s.digits)));
        table.push_row("Residual Std. Error", RowKind::Statistic, cells)?;
    }
    if options.show_f_stat {
        let cells = row(|m, s| m.f_statistic().map_or_else(String::new, |v| fixed(v, s.digits)));
        table.push_row("F Statistic", RowKind::Statistic, cells)?;
    }

    let mut notes = Vec::with_capacity(options.notes.len() + 1);
    if !options.covariate_order.is_empty() {
        notes.push(format!(
            "Note: *p<{}; **p<{}; ***p<{}",
            style.stars.one, style.stars.two, style.stars.three
        ));
    }
    notes.extend(options.notes.iter().cloned());
    table.notes = notes;

    tracing::debug!(columns = n, rows = table.rows.len(), "assembled comparison table");
    Ok(table)
}

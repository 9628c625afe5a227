//! # si-report
//!
//! Reporting layer of the replication study: data preparation, the fixed
//! catalogue of regression specifications, comparison tables and figure
//! assembly. Estimation itself lives in `si-inference`.

/// Fixed catalogue of tables.
pub mod catalogue;
/// Comparison tables over fitted models.
pub mod comparison;
/// Figure assembly.
pub mod figures;
/// Variable labels.
pub mod labels;
/// Study data, analysis views and summary statistics.
pub mod prepare;
/// Fitting specifications.
pub mod runner;
/// Regression specifications.
pub mod spec;
/// Table model and renderers.
pub mod table;

pub use catalogue::{ReportId, build_report};
pub use comparison::{StarLevels, TableOptions, TableStyle, comparison_table, significance_stars};
pub use figures::figure1;
pub use labels::VariableCatalogue;
pub use prepare::{StudyData, analysis_view, prepare_country_data, prepare_region_data, summary_statistics};
pub use runner::{Fit, TwoStepFit, fit_all, fit_spec};
pub use spec::{Estimator, NestedSpecs, RegressionSpec, interleave};
pub use table::{OutputFormat, Report, Table};

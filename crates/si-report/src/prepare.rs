//! Study data assembly, per-analysis views and summary statistics.

use serde::Serialize;
use si_core::{Error, Frame, Result};

use crate::labels::VariableCatalogue;
use crate::spec::RegressionSpec;

/// Entity code whose missionary-source dummy is corrected.
pub const HKG: &str = "HKG";

/// Country variables kept by the summary view, in display order.
pub const COUNTRY_SUMMARY: [&str; 14] = [
    "logpgdp05",
    "tyr05_n",
    "ruleoflaw",
    "prienr1900",
    "protmiss",
    "lcapped",
    "lpd1500s",
    "dummy_dennis",
    "lat_abst",
    "f_brit",
    "f_french",
    "africa",
    "asia",
    "america",
];

/// Region variables kept by the summary view, in display order.
pub const REGION_SUMMARY: [&str; 8] = [
    "lgdp",
    "yearsed",
    "temp_avg",
    "invdistcoast",
    "landlocked",
    "miss_presence",
    "capital_old",
    "lpopd_i",
];

/// Rows of the country table enter an analysis only with schooling observed.
pub const COUNTRY_BASE_SAMPLE: [&str; 1] = ["tyr05_n"];
/// Rows of the region table enter an analysis only with schooling and income observed.
pub const REGION_BASE_SAMPLE: [&str; 2] = ["yearsed", "lgdp"];

/// Raw inputs of the study, with corrections applied exactly once.
#[derive(Debug, Clone)]
pub struct StudyData {
    country: Frame,
    region: Option<Frame>,
}

impl StudyData {
    /// Assemble the study inputs and apply the HKG correction.
    pub fn new(country: Frame, region: Option<Frame>) -> Result<Self> {
        let country = apply_hkg_correction(&country)?;
        Ok(Self { country, region })
    }

    /// Corrected country table.
    pub fn country(&self) -> &Frame {
        &self.country
    }

    /// Region table.
    pub fn region(&self) -> Result<&Frame> {
        self.region
            .as_ref()
            .ok_or_else(|| Error::Validation("this report needs the region table".into()))
    }

    /// Whether the region table was supplied.
    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }
}

/// Force `dummy_dennis` to zero on the HKG row. Other rows are untouched.
pub fn apply_hkg_correction(country: &Frame) -> Result<Frame> {
    let (patched, changed) = country.set_where("code", HKG, "dummy_dennis", 0.0)?;
    if changed == 0 {
        tracing::warn!("no {HKG} row found; dummy_dennis left as loaded");
    } else {
        tracing::debug!(rows = changed, "applied {HKG} dummy_dennis correction");
    }
    Ok(patched)
}

/// Rows usable by `spec`: base-sample rows that pass every filter and are
/// non-missing on every referenced variable.
pub fn analysis_view<S: AsRef<str>>(data: &Frame, spec: &RegressionSpec, base_sample: &[S]) -> Result<Frame> {
    let mut view = data.complete_cases(base_sample)?;
    view = view.apply_filters(&spec.filters)?;
    view.complete_cases(&spec.referenced_variables())
}

/// Renamed, column-reduced country view: rows with schooling observed.
pub fn prepare_country_data(country: &Frame, catalogue: &VariableCatalogue) -> Result<Frame> {
    let view = country.complete_cases(&COUNTRY_BASE_SAMPLE)?.select(&COUNTRY_SUMMARY)?;
    view.rename(&catalogue.rename_pairs(&COUNTRY_SUMMARY))
}

/// Renamed, column-reduced region view: rows with schooling, income and
/// capital city observed.
pub fn prepare_region_data(region: &Frame, catalogue: &VariableCatalogue) -> Result<Frame> {
    let view = region
        .complete_cases(&["yearsed", "lgdp", "capital_old"])?
        .select(&REGION_SUMMARY)?;
    view.rename(&catalogue.rename_pairs(&REGION_SUMMARY))
}

/// Descriptive statistics of one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Variable label.
    pub variable: String,
    /// Non-missing observations.
    pub observations: usize,
    /// Mean of the non-missing values.
    pub mean: f64,
    /// Sample standard deviation (`n - 1` divisor); NaN with fewer than two values.
    pub sd: f64,
}

/// Observations, mean and standard deviation of every numeric column.
pub fn summary_statistics(view: &Frame) -> Result<Vec<SummaryRow>> {
    view.names()
        .iter()
        .map(|name| {
            let values: Vec<f64> =
                view.numeric(name)?.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
            let n = values.len();
            let mean = if n == 0 { f64::NAN } else { values.iter().sum::<f64>() / n as f64 };
            let sd = if n < 2 {
                f64::NAN
            } else {
                (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
            };
            Ok(SummaryRow { variable: name.clone(), observations: n, mean, sd })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use si_core::{Column, CovarianceType, RowFilter};

    fn countries() -> Frame {
        Frame::from_columns(vec![
            ("code", Column::from(vec!["AUS", "HKG", "IND", "PER"])),
            ("dummy_dennis", Column::from(vec![1.0, 1.0, 1.0, 0.0])),
            ("tyr05_n", Column::from(vec![Some(12.0), Some(10.0), None, Some(8.0)])),
            ("logpgdp05", Column::from(vec![10.4, 10.3, 7.8, 8.7])),
            ("protmiss", Column::from(vec![Some(0.0), Some(1.2), Some(0.9), None])),
        ])
        .unwrap()
    }

    #[test]
    fn hkg_correction_touches_one_row() {
        let study = StudyData::new(countries(), None).unwrap();
        let d = study.country().numeric("dummy_dennis").unwrap();
        assert_eq!(d, &[Some(1.0), Some(0.0), Some(1.0), Some(0.0)]);
        assert!(study.region().is_err());
    }

    #[test]
    fn view_drops_incomplete_and_filtered_rows() {
        let spec = RegressionSpec::ols("logpgdp05", &["protmiss"], CovarianceType::HC1)
            .with_filters(vec![RowFilter::ne("protmiss", 0.0)]);
        let view = analysis_view(&countries(), &spec, &COUNTRY_BASE_SAMPLE).unwrap();
        // IND lacks schooling, PER lacks protmiss, AUS fails the filter.
        assert_eq!(view.labels("code").unwrap(), vec!["HKG"]);
    }

    #[test]
    fn summary_uses_sample_sd() {
        let f = Frame::from_columns(vec![("x", Column::from(vec![Some(1.0), Some(2.0), None, Some(3.0)]))])
            .unwrap();
        let rows = summary_statistics(&f).unwrap();
        assert_eq!(rows[0].observations, 3);
        assert_abs_diff_eq!(rows[0].mean, 2.0);
        assert_abs_diff_eq!(rows[0].sd, 1.0);
    }
}

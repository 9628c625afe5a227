//! Regression specifications and the nested-controls builder.

use serde::Serialize;
use si_core::{CovarianceType, RowFilter};
use si_inference::IvEstimator;

/// How a specification is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cov", rename_all = "snake_case")]
pub enum Estimator {
    /// Ordinary least squares.
    Ols(CovarianceType),
    /// Manual 2SLS: first-stage OLS per endogenous regressor, then OLS of the
    /// outcome on the fitted values. Second-stage standard errors are the
    /// plain OLS ones and ignore the generated regressor.
    TwoStepOls(CovarianceType),
    /// Direct two-stage least squares.
    Iv2sls(CovarianceType),
    /// Limited-information maximum likelihood.
    Liml(CovarianceType),
}

impl Estimator {
    /// Covariance estimator.
    pub fn cov_type(self) -> CovarianceType {
        match self {
            Estimator::Ols(c) | Estimator::TwoStepOls(c) | Estimator::Iv2sls(c) | Estimator::Liml(c) => c,
        }
    }

    /// Whether the estimator needs an endogenous/instrument partition.
    pub fn is_iv(self) -> bool {
        !matches!(self, Estimator::Ols(_))
    }

    /// The k-class member for direct IV estimators.
    pub fn k_class(self) -> Option<IvEstimator> {
        match self {
            Estimator::Iv2sls(_) => Some(IvEstimator::TwoSls),
            Estimator::Liml(_) => Some(IvEstimator::Liml),
            _ => None,
        }
    }
}

/// One regression: variable partition, sample restrictions and estimator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionSpec {
    /// Outcome.
    pub dependent: String,
    /// Included exogenous regressors (intercept excluded).
    pub exog: Vec<String>,
    /// Endogenous regressors.
    pub endog: Vec<String>,
    /// Excluded instruments.
    pub instruments: Vec<String>,
    /// Add a constant column.
    pub intercept: bool,
    /// Categorical column expanded into fixed-effect dummies.
    pub fixed_effects: Option<String>,
    /// Row filters applied before estimation.
    pub filters: Vec<RowFilter>,
    /// Extra variables that must be non-missing.
    pub require: Vec<String>,
    /// Estimator.
    pub estimator: Estimator,
}

impl RegressionSpec {
    /// OLS of `dependent` on `exog` with an intercept.
    pub fn ols<S: AsRef<str>>(dependent: &str, exog: &[S], cov: CovarianceType) -> Self {
        Self {
            dependent: dependent.to_string(),
            exog: owned(exog),
            endog: Vec::new(),
            instruments: Vec::new(),
            intercept: true,
            fixed_effects: None,
            filters: Vec::new(),
            require: Vec::new(),
            estimator: Estimator::Ols(cov),
        }
    }

    /// IV-type specification with an intercept.
    pub fn iv<S: AsRef<str>>(
        dependent: &str,
        exog: &[S],
        endog: &[S],
        instruments: &[S],
        estimator: Estimator,
    ) -> Self {
        Self {
            endog: owned(endog),
            instruments: owned(instruments),
            estimator,
            ..Self::ols(dependent, exog, estimator.cov_type())
        }
    }

    /// Drop the constant.
    pub fn without_intercept(mut self) -> Self {
        self.intercept = false;
        self
    }

    /// Absorb `key` through dummy columns.
    pub fn with_fixed_effects(mut self, key: &str) -> Self {
        self.fixed_effects = Some(key.to_string());
        self
    }

    /// Add row filters.
    pub fn with_filters(mut self, filters: Vec<RowFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Require extra variables to be non-missing.
    pub fn requiring<S: AsRef<str>>(mut self, vars: &[S]) -> Self {
        push_unique(&mut self.require, vars.iter().map(|v| v.as_ref().to_string()));
        self
    }

    /// Every variable the specification touches, first occurrence order.
    pub fn referenced_variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        push_unique(&mut out, std::iter::once(self.dependent.clone()));
        push_unique(&mut out, self.exog.iter().cloned());
        push_unique(&mut out, self.endog.iter().cloned());
        push_unique(&mut out, self.instruments.iter().cloned());
        push_unique(&mut out, self.fixed_effects.iter().cloned());
        push_unique(&mut out, self.require.iter().cloned());
        push_unique(&mut out, self.filters.iter().map(|f| f.column.clone()));
        out
    }

    /// OLS first stage of endogenous regressor `endog` on instruments and
    /// exogenous regressors, on the same sample as `self`.
    pub fn first_stage(&self, endog: &str, cov: CovarianceType) -> Self {
        let mut regressors = self.instruments.clone();
        push_unique(&mut regressors, self.exog.iter().cloned());
        let mut require = self.require.clone();
        push_unique(&mut require, std::iter::once(self.dependent.clone()));
        push_unique(&mut require, self.endog.iter().cloned());
        Self {
            dependent: endog.to_string(),
            exog: regressors,
            endog: Vec::new(),
            instruments: Vec::new(),
            intercept: self.intercept,
            fixed_effects: self.fixed_effects.clone(),
            filters: self.filters.clone(),
            require,
            estimator: Estimator::Ols(cov),
        }
    }
}

fn owned<S: AsRef<str>>(vars: &[S]) -> Vec<String> {
    vars.iter().map(|v| v.as_ref().to_string()).collect()
}

fn push_unique(out: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
}

/// Builder for a sequence of specifications that add control blocks one at a
/// time: `base`, `base + blocks[0]`, `base + blocks[0] + blocks[1]`, ...
///
/// An empty block repeats the previous column.
#[derive(Debug, Clone)]
pub struct NestedSpecs {
    template: RegressionSpec,
    blocks: Vec<Vec<String>>,
}

impl NestedSpecs {
    /// Nested OLS specifications.
    pub fn ols<S: AsRef<str>>(dependent: &str, base: &[S], cov: CovarianceType) -> Self {
        Self { template: RegressionSpec::ols(dependent, base, cov), blocks: Vec::new() }
    }

    /// Nested IV-type specifications.
    pub fn iv<S: AsRef<str>>(
        dependent: &str,
        base: &[S],
        endog: &[S],
        instruments: &[S],
        estimator: Estimator,
    ) -> Self {
        Self {
            template: RegressionSpec::iv(dependent, base, endog, instruments, estimator),
            blocks: Vec::new(),
        }
    }

    /// Append a control block.
    pub fn block<S: AsRef<str>>(mut self, vars: &[S]) -> Self {
        self.blocks.push(owned(vars));
        self
    }

    /// Append several control blocks.
    pub fn blocks(self, blocks: &[&[&str]]) -> Self {
        blocks.iter().fold(self, |acc, b| acc.block(*b))
    }

    /// Modify the shared template (filters, fixed effects, sample requirements).
    pub fn map(mut self, f: impl FnOnce(RegressionSpec) -> RegressionSpec) -> Self {
        self.template = f(self.template);
        self
    }

    /// `blocks + 1` specifications.
    pub fn build(&self) -> Vec<RegressionSpec> {
        let mut out = Vec::with_capacity(self.blocks.len() + 1);
        let mut current = self.template.clone();
        out.push(current.clone());
        for block in &self.blocks {
            current.exog.extend(block.iter().cloned());
            out.push(current.clone());
        }
        out
    }
}

/// Merge nested lists column-wise: the first spec of every list, then the
/// second of every list, and so on. Lists may have different lengths.
pub fn interleave(lists: Vec<Vec<RegressionSpec>>) -> Vec<RegressionSpec> {
    let longest = lists.iter().map(Vec::len).max().unwrap_or(0);
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::new();
    for _ in 0..longest {
        out.extend(iters.iter_mut().filter_map(Iterator::next));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_adds_blocks_cumulatively() {
        let specs = NestedSpecs::ols("y", &["a"], CovarianceType::HC3)
            .blocks(&[&["b"], &["c", "d"]])
            .build();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].exog, vec!["a"]);
        assert_eq!(specs[1].exog, vec!["a", "b"]);
        assert_eq!(specs[2].exog, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_block_repeats_column() {
        let specs = NestedSpecs::ols("y", &["a"], CovarianceType::HC3)
            .block(&["b"])
            .block::<&str>(&[])
            .build();
        assert_eq!(specs[1], specs[2]);
    }

    #[test]
    fn interleave_is_column_wise() {
        let a = NestedSpecs::ols("y", &["a"], CovarianceType::HC3).block(&["c"]).build();
        let b = NestedSpecs::ols("y", &["b"], CovarianceType::HC3).block(&["c"]).build();
        let merged = interleave(vec![a, b]);
        let firsts: Vec<&str> = merged.iter().map(|s| s.exog[0].as_str()).collect();
        assert_eq!(firsts, vec!["a", "b", "a", "b"]);
        assert_eq!(merged[2].exog, vec!["a", "c"]);
    }

    #[test]
    fn referenced_variables_cover_every_role() {
        let spec = RegressionSpec::iv(
            "y",
            &["w"],
            &["x"],
            &["z1", "z2"],
            Estimator::Liml(CovarianceType::HC0),
        )
        .with_fixed_effects("g")
        .with_filters(vec![RowFilter::lt("f", 1.0)])
        .requiring(&["r", "w"]);
        assert_eq!(spec.referenced_variables(), vec!["y", "w", "x", "z1", "z2", "g", "r", "f"]);
    }

    #[test]
    fn first_stage_keeps_sample() {
        let spec = RegressionSpec::iv(
            "y",
            &["w"],
            &["x"],
            &["z"],
            Estimator::TwoStepOls(CovarianceType::HC3),
        );
        let fs = spec.first_stage("x", CovarianceType::HC3);
        assert_eq!(fs.dependent, "x");
        assert_eq!(fs.exog, vec!["z", "w"]);
        assert!(fs.require.contains(&"y".to_string()));
        assert!(!fs.estimator.is_iv());
    }
}

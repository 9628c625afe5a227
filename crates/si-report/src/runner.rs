//! Fit [`RegressionSpec`]s against a frame.

use serde::Serialize;
use si_core::{CovarianceType, Error, FittedModel, Frame, OverIdTest, Result};
use si_inference::{Design, IvEstimator, IvResult, OlsResult, iv_fit, ols_fit};

use crate::prepare::analysis_view;
use crate::spec::{Estimator, RegressionSpec};

/// Outcome of the manual two-step procedure.
#[derive(Debug, Clone, Serialize)]
pub struct TwoStepFit {
    /// Second-stage OLS; fitted values carry the endogenous regressor's name.
    pub second: OlsResult,
    /// First-stage OLS, one per endogenous regressor.
    pub first: Vec<OlsResult>,
    /// Over-identification test from the direct 2SLS fit of the same partition.
    pub overid: OverIdTest,
}

/// A fitted specification.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fit {
    /// Plain OLS.
    Ols(OlsResult),
    /// Manual two-step 2SLS.
    TwoStep(TwoStepFit),
    /// Direct k-class IV.
    Iv(IvResult),
}

impl Fit {
    /// First-stage regressions, when the fit has any.
    pub fn first_stages(&self) -> &[OlsResult] {
        match self {
            Fit::TwoStep(t) => &t.first,
            _ => &[],
        }
    }

    /// First stage explaining `endog`.
    pub fn first_stage(&self, endog: &str) -> Result<&OlsResult> {
        self.first_stages()
            .iter()
            .find(|f| f.dependent == endog)
            .ok_or_else(|| Error::Validation(format!("no first stage for '{endog}'")))
    }

    fn model(&self) -> &dyn FittedModel {
        match self {
            Fit::Ols(r) => r,
            Fit::TwoStep(t) => &t.second,
            Fit::Iv(r) => r,
        }
    }
}

impl FittedModel for Fit {
    fn dependent(&self) -> &str {
        self.model().dependent()
    }
    fn estimator_label(&self) -> &str {
        match self {
            Fit::TwoStep(_) => "2SLS (two-step)",
            _ => self.model().estimator_label(),
        }
    }
    fn covariance_label(&self) -> &str {
        self.model().covariance_label()
    }
    fn parameter_names(&self) -> &[String] {
        self.model().parameter_names()
    }
    fn coefficients(&self) -> &[f64] {
        self.model().coefficients()
    }
    fn std_errors(&self) -> &[f64] {
        self.model().std_errors()
    }
    fn p_values(&self) -> &[f64] {
        self.model().p_values()
    }
    fn n_obs(&self) -> usize {
        self.model().n_obs()
    }
    fn r_squared(&self) -> f64 {
        self.model().r_squared()
    }
    fn adj_r_squared(&self) -> f64 {
        self.model().adj_r_squared()
    }
    fn residual_std_error(&self) -> Option<f64> {
        self.model().residual_std_error()
    }
    fn f_statistic(&self) -> Option<f64> {
        self.model().f_statistic()
    }
    fn overid(&self) -> Option<OverIdTest> {
        match self {
            Fit::TwoStep(t) => Some(t.overid),
            _ => self.model().overid(),
        }
    }
}

/// Design from frame columns; dense, so the view must already be complete.
fn columns(view: &Frame, vars: &[String]) -> Result<Design> {
    let cols = vars.iter().map(|v| Ok((v.clone(), view.dense(v)?))).collect::<Result<Vec<_>>>()?;
    Design::from_columns(view.n_rows(), cols)
}

/// Included exogenous block: optional intercept, regressors, fixed-effect dummies.
fn exogenous(view: &Frame, spec: &RegressionSpec) -> Result<Design> {
    let mut design = columns(view, &spec.exog)?;
    if let Some(key) = &spec.fixed_effects {
        let dummies = Design::from_columns(view.n_rows(), view.dummies(key, spec.intercept)?)?;
        design = design.hstack(&dummies)?;
    }
    Ok(if spec.intercept { design.with_intercept() } else { design })
}

/// Fit one specification on its own analysis view of `data`.
pub fn fit_spec<S: AsRef<str>>(data: &Frame, spec: &RegressionSpec, base_sample: &[S]) -> Result<Fit> {
    if spec.estimator.is_iv() && spec.endog.is_empty() {
        return Err(Error::Validation(format!(
            "IV specification for '{}' has no endogenous regressor",
            spec.dependent
        )));
    }
    let view = analysis_view(data, spec, base_sample)?;
    let y = view.dense(&spec.dependent)?;
    let exog = exogenous(&view, spec)?;

    let fit = match spec.estimator {
        Estimator::Ols(cov) => Fit::Ols(ols_fit(&y, &exog, &spec.dependent, cov)?),
        Estimator::TwoStepOls(cov) => Fit::TwoStep(two_step(&view, spec, &y, &exog, cov)?),
        Estimator::Iv2sls(cov) | Estimator::Liml(cov) => {
            let estimator = spec.estimator.k_class().unwrap_or(IvEstimator::TwoSls);
            let endog = columns(&view, &spec.endog)?;
            let instruments = columns(&view, &spec.instruments)?;
            Fit::Iv(iv_fit(&y, &exog, &endog, &instruments, &spec.dependent, estimator, cov)?)
        }
    };
    tracing::debug!(
        dependent = %spec.dependent,
        estimator = fit.estimator_label(),
        n = fit.n_obs(),
        k = fit.parameter_names().len(),
        "fitted specification"
    );
    Ok(fit)
}

fn two_step(
    view: &Frame,
    spec: &RegressionSpec,
    y: &[f64],
    exog: &Design,
    cov: CovarianceType,
) -> Result<TwoStepFit> {
    let n = view.n_rows();
    let instruments = columns(view, &spec.instruments)?;
    let first_design = exog.hstack(&instruments)?;

    let mut first = Vec::with_capacity(spec.endog.len());
    let mut proxies = Vec::with_capacity(spec.endog.len());
    for e in &spec.endog {
        let stage = ols_fit(&view.dense(e)?, &first_design, e, cov)?;
        proxies.push((e.clone(), stage.fitted.clone()));
        first.push(stage);
    }
    let second = ols_fit(y, &exog.hstack(&Design::from_columns(n, proxies)?)?, &spec.dependent, cov)?;

    let endog = columns(view, &spec.endog)?;
    let direct = iv_fit(y, exog, &endog, &instruments, &spec.dependent, IvEstimator::TwoSls, CovarianceType::HC0)?;

    Ok(TwoStepFit { second, first, overid: direct.wooldridge })
}

/// Fit every specification, in order.
pub fn fit_all<S: AsRef<str>>(data: &Frame, specs: &[RegressionSpec], base_sample: &[S]) -> Result<Vec<Fit>> {
    specs.iter().map(|s| fit_spec(data, s, base_sample)).collect()
}

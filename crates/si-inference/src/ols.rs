//! Ordinary least squares with classical and heteroskedasticity-robust
//! standard errors.
//!
//! p-values follow the usual convention: Student-t with `n - k` degrees of
//! freedom for the classical covariance, standard normal for the robust
//! (HC0–HC3) ones. The reported F statistic is the Wald test of all non-constant
//! regressors using the chosen covariance, divided by the number of
//! restrictions.

use nalgebra::DMatrix;
use serde::Serialize;
use si_core::{CovarianceType, FittedModel, Result};

use crate::covariance::{covariance, std_errors, wald_statistic};
use crate::design::{Design, invert, require_full_rank, validate_y};
use crate::dist::{f_sf, normal_two_sided, t_two_sided};

/// Result of an OLS regression.
#[derive(Debug, Clone, Serialize)]
pub struct OlsResult {
    /// Dependent variable name.
    pub dependent: String,
    /// Parameter names (design column names).
    pub names: Vec<String>,
    /// Coefficient estimates.
    pub coefficients: Vec<f64>,
    /// Standard errors.
    pub se: Vec<f64>,
    /// t (classical) or z (robust) statistics.
    pub statistics: Vec<f64>,
    /// Two-sided p-values.
    pub p_values: Vec<f64>,
    /// Parameter covariance, row-major k × k.
    pub covariance: Vec<f64>,
    /// Covariance estimator.
    pub cov_type: CovarianceType,
    /// In-sample fitted values.
    pub fitted: Vec<f64>,
    /// Residuals.
    pub residuals: Vec<f64>,
    /// Number of observations.
    pub n_obs: usize,
    /// Residual degrees of freedom (`n - k`).
    pub df_resid: f64,
    /// R² (centred when the design has a constant, uncentred otherwise).
    pub r_squared: f64,
    /// Adjusted R².
    pub adj_r_squared: f64,
    /// Residual standard error `sqrt(SSR / (n - k))`.
    pub residual_se: f64,
    /// Wald F statistic of the non-constant regressors.
    pub f_stat: Option<f64>,
    /// p-value of `f_stat`.
    pub f_p_value: Option<f64>,
}

/// Fit `y = Xβ + e` by least squares.
///
/// `x` must already contain the intercept column if one is wanted
/// (see [`Design::with_intercept`]).
pub fn ols_fit(y: &[f64], x: &Design, dependent: &str, cov_type: CovarianceType) -> Result<OlsResult> {
    let y_vec = validate_y(y, x)?;
    let n = x.n();
    let k = x.k();
    if k == 0 {
        return Err(si_core::Error::Validation("X must have at least 1 column".into()));
    }
    if n <= k {
        return Err(si_core::Error::Validation(format!(
            "too few observations ({n}) for {k} regressors"
        )));
    }

    let x_mat = x.to_matrix();
    require_full_rank(&x_mat, x.names(), "OLS design")?;
    let xtx_inv = invert(x_mat.transpose() * &x_mat, "X'X")?;
    let beta = &xtx_inv * (x_mat.transpose() * &y_vec);
    let fitted = &x_mat * &beta;
    let resid = &y_vec - &fitted;
    let coefficients: Vec<f64> = beta.iter().copied().collect();
    if coefficients.iter().any(|b| !b.is_finite()) {
        return Err(si_core::Error::Computation("non-finite OLS estimates".into()));
    }

    let df_resid = (n - k) as f64;
    let cov = covariance(&x_mat, &resid, &xtx_inv, cov_type, df_resid)?;
    let t_df = (!cov_type.is_robust()).then_some(df_resid);
    let tests = coefficient_tests(&coefficients, &cov, t_df)?;

    let ssr = resid.norm_squared();
    let has_const = x.has_constant();
    let tss = total_sum_of_squares(y, has_const);
    let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { 0.0 };
    let k_const = if has_const { 1.0 } else { 0.0 };
    let adj_r_squared = 1.0 - (n as f64 - k_const) / df_resid * (1.0 - r_squared);

    let (f_stat, f_p_value) = joint_f(&coefficients, &cov, &slope_indices(x), df_resid)?;

    tracing::debug!(dependent, n, k, cov = %cov_type, r_squared, "OLS fit");

    Ok(OlsResult {
        dependent: dependent.to_string(),
        names: x.names().to_vec(),
        coefficients,
        se: tests.se,
        statistics: tests.statistics,
        p_values: tests.p_values,
        covariance: row_major(&cov),
        cov_type,
        fitted: fitted.iter().copied().collect(),
        residuals: resid.iter().copied().collect(),
        n_obs: n,
        df_resid,
        r_squared,
        adj_r_squared,
        residual_se: (ssr / df_resid).sqrt(),
        f_stat,
        f_p_value,
    })
}

impl OlsResult {
    /// Predictions `Xβ` for a design with the same columns as the fit.
    pub fn predict(&self, x: &Design) -> Result<Vec<f64>> {
        if x.names() != self.names.as_slice() {
            return Err(si_core::Error::Validation(format!(
                "prediction design columns {:?} do not match fitted {:?}",
                x.names(),
                self.names
            )));
        }
        Ok((0..x.n())
            .map(|i| x.row(i).iter().zip(&self.coefficients).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.residuals.iter().map(|e| e * e).sum()
    }
}

impl FittedModel for OlsResult {
    fn dependent(&self) -> &str {
        &self.dependent
    }
    fn estimator_label(&self) -> &str {
        "OLS"
    }
    fn covariance_label(&self) -> &str {
        self.cov_type.label()
    }
    fn parameter_names(&self) -> &[String] {
        &self.names
    }
    fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
    fn std_errors(&self) -> &[f64] {
        &self.se
    }
    fn p_values(&self) -> &[f64] {
        &self.p_values
    }
    fn n_obs(&self) -> usize {
        self.n_obs
    }
    fn r_squared(&self) -> f64 {
        self.r_squared
    }
    fn adj_r_squared(&self) -> f64 {
        self.adj_r_squared
    }
    fn residual_std_error(&self) -> Option<f64> {
        Some(self.residual_se)
    }
    fn f_statistic(&self) -> Option<f64> {
        self.f_stat
    }
}

pub(crate) struct CoefficientTests {
    pub se: Vec<f64>,
    pub statistics: Vec<f64>,
    pub p_values: Vec<f64>,
}

/// Standard errors, test statistics and p-values from a covariance matrix.
///
/// With `t_df` set the p-values are Student-t with that many degrees of
/// freedom, otherwise standard normal.
pub(crate) fn coefficient_tests(
    coefficients: &[f64],
    cov: &DMatrix<f64>,
    t_df: Option<f64>,
) -> Result<CoefficientTests> {
    let se = std_errors(cov);
    let statistics: Vec<f64> = coefficients.iter().zip(&se).map(|(b, s)| b / s).collect();
    let p_values = statistics
        .iter()
        .map(|&t| match t_df {
            Some(df) => t_two_sided(t, df),
            None => Ok(normal_two_sided(t)),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CoefficientTests { se, statistics, p_values })
}

/// Wald F of `β_S = 0` and its p-value. `None` when there is nothing to test
/// or the restricted covariance is degenerate (a perfect fit).
pub(crate) fn joint_f(
    coefficients: &[f64],
    cov: &DMatrix<f64>,
    subset: &[usize],
    df_resid: f64,
) -> Result<(Option<f64>, Option<f64>)> {
    if subset.is_empty() {
        return Ok((None, None));
    }
    let q = subset.len() as f64;
    match wald_statistic(coefficients, cov, subset) {
        Ok(w) => {
            let f = w / q;
            Ok((Some(f), Some(f_sf(f, q, df_resid)?)))
        }
        Err(_) => Ok((None, None)),
    }
}

pub(crate) fn total_sum_of_squares(y: &[f64], centred: bool) -> f64 {
    let mean = if centred { y.iter().sum::<f64>() / y.len() as f64 } else { 0.0 };
    y.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Indices of the columns that are not constant.
pub(crate) fn slope_indices(x: &Design) -> Vec<usize> {
    (0..x.k())
        .filter(|&j| {
            let col = x.column(j);
            col.iter().any(|v| *v != col[0])
        })
        .collect()
}

pub(crate) fn row_major(m: &DMatrix<f64>) -> Vec<f64> {
    let mut out = Vec::with_capacity(m.nrows() * m.ncols());
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            out.push(m[(i, j)]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn design(x: &[f64]) -> Design {
        Design::from_columns(x.len(), vec![("x".into(), x.to_vec())]).unwrap().with_intercept()
    }

    #[test]
    fn exact_line_is_recovered() {
        let x: Vec<f64> = (1..=8).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        let res = ols_fit(&y, &design(&x), "y", CovarianceType::Unadjusted).unwrap();
        assert_abs_diff_eq!(res.coefficients[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(res.coefficients[1], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(res.r_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn orthogonal_noise_keeps_slope() {
        // Noise pattern orthogonal to [1, x] for x = 1..8.
        let x: Vec<f64> = (1..=8).map(f64::from).collect();
        let noise = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0];
        let y: Vec<f64> = x.iter().zip(noise).map(|(v, e)| 1.0 + 2.0 * v + 0.1 * e).collect();
        let res = ols_fit(&y, &design(&x), "y", CovarianceType::HC3).unwrap();
        assert_abs_diff_eq!(res.coefficients[1], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(res.ssr(), 0.08, epsilon = 1e-10);
        assert!(res.p_values[1] < 0.01);
        assert_eq!(res.n_obs, 8);
        assert_eq!(res.df_resid, 6.0);
        let f = res.f_stat.unwrap();
        let z = res.statistics[1];
        assert_abs_diff_eq!(f, z * z, epsilon = 1e-6 * f);
    }

    #[test]
    fn classical_se_matches_formula() {
        // y = [1, 3, 2, 5]; x = [0, 1, 2, 3]
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 2.0, 5.0];
        let res = ols_fit(&y, &design(&x), "y", CovarianceType::Unadjusted).unwrap();
        // Sxx = 5, slope = Sxy / Sxx = 5.5 / 5
        assert_abs_diff_eq!(res.coefficients[1], 1.1, epsilon = 1e-12);
        let sigma2 = res.ssr() / 2.0;
        assert_abs_diff_eq!(res.se[1], (sigma2 / 5.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(res.residual_se, sigma2.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn predict_uses_same_columns() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 2.0, 5.0];
        let d = design(&x);
        let res = ols_fit(&y, &d, "y", CovarianceType::HC1).unwrap();
        let p = res.predict(&d).unwrap();
        for (a, b) in p.iter().zip(&res.fitted) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        let other = Design::from_columns(4, vec![("z".into(), x.to_vec())]).unwrap();
        assert!(res.predict(&other).is_err());
    }

    #[test]
    fn collinear_design_is_computation_error() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let d = Design::from_columns(
            4,
            vec![("a".into(), x.to_vec()), ("b".into(), x.iter().map(|v| 2.0 * v).collect())],
        )
        .unwrap();
        let err = ols_fit(&[1.0, 2.0, 3.0, 5.0], &d, "y", CovarianceType::HC0).unwrap_err();
        assert!(matches!(err, si_core::Error::Computation(_)));
    }

    #[test]
    fn real_valued_collinearity_is_computation_error() {
        let a: Vec<f64> = (0..12).map(|i| 0.15 + (i as f64 * 0.83).sin()).collect();
        let b: Vec<f64> = (0..12).map(|i| 1.35 * (i as f64 * 0.41).cos()).collect();
        let c: Vec<f64> = a.iter().zip(&b).map(|(a, b)| 0.3 * a + 1.7 * b).collect();
        let y: Vec<f64> = (0..12).map(|i| 0.5 + a[i] - 0.25 * b[i] + 0.1 * (i as f64 * 2.7).sin()).collect();
        let d = Design::from_columns(12, vec![("a".into(), a), ("b".into(), b), ("c".into(), c)])
            .unwrap()
            .with_intercept();
        let err = ols_fit(&y, &d, "y", CovarianceType::HC3).unwrap_err();
        assert!(matches!(&err, si_core::Error::Computation(msg) if msg.contains("OLS design")), "{err}");
    }

    #[test]
    fn too_few_rows() {
        let d = design(&[1.0, 2.0]);
        assert!(ols_fit(&[1.0, 2.0], &d, "y", CovarianceType::HC0).is_err());
    }
}

//! Instrumental variables: k-class estimators (2SLS and LIML).
//!
//! With `X = [exog | endog]` and `Z = [exog | instruments]`,
//!
//! `β(κ) = [(1-κ)X'X + κX'P_Z X]⁻¹ [(1-κ)X'y + κX'P_Z y]`
//!
//! where `κ = 1` is two-stage least squares and `κ` equal to the smallest
//! eigenvalue of `(W'M_Z W)⁻¹ W'M_X W`, `W = [y | endog]`, is LIML.
//! `P_Z` is never formed; every product goes through `Z'X` and `(Z'Z)⁻¹`.
//!
//! Covariances use the effective regressors `X̃ = (1-κ)X + κP_Z X` and the
//! structural residuals `y - Xβ`. The classical estimator divides the residual
//! sum of squares by `n`; p-values are standard normal.
//!
//! # References
//!
//! - Wooldridge, *Econometric Analysis of Cross Section and Panel Data*, Ch. 5.
//! - Stock & Yogo (2005), "Testing for weak instruments in linear IV regression."
//! - Anderson & Rubin (1949), "Estimation of the parameters of a single
//!   equation in a complete system of stochastic equations."

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::Serialize;
use si_core::{CovarianceType, Error, FittedModel, OverIdTest, Result};

use crate::covariance::covariance;
use crate::design::{Design, invert, require_full_rank, validate_y};
use crate::ols::{coefficient_tests, joint_f, row_major, slope_indices, total_sum_of_squares};
use crate::overid::{hcat, sargan, wooldridge_score};

/// Member of the k-class family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IvEstimator {
    /// Two-stage least squares (`κ = 1`).
    TwoSls,
    /// Limited-information maximum likelihood.
    Liml,
}

impl IvEstimator {
    /// Table label.
    pub fn label(self) -> &'static str {
        match self {
            IvEstimator::TwoSls => "IV-2SLS",
            IvEstimator::Liml => "IV-LIML",
        }
    }
}

/// First-stage regression diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct FirstStageResult {
    /// Endogenous regressor explained by this stage.
    pub endog: String,
    /// F-statistic of the excluded instruments.
    pub f_stat: f64,
    /// First-stage R².
    pub r_squared: f64,
    /// Partial R² of the excluded instruments.
    pub partial_r_squared: f64,
    /// Whether `f_stat` exceeds the Stock–Yogo 10% maximal IV size critical
    /// value for a single endogenous regressor.
    pub passes_stock_yogo_10: bool,
}

/// Result of a k-class IV regression.
#[derive(Debug, Clone, Serialize)]
pub struct IvResult {
    /// Dependent variable name.
    pub dependent: String,
    /// Estimator used.
    pub estimator: IvEstimator,
    /// Parameter names: exogenous regressors, then endogenous.
    pub names: Vec<String>,
    /// Coefficient estimates.
    pub coefficients: Vec<f64>,
    /// Standard errors.
    pub se: Vec<f64>,
    /// z statistics.
    pub statistics: Vec<f64>,
    /// Two-sided p-values.
    pub p_values: Vec<f64>,
    /// Parameter covariance, row-major k × k.
    pub covariance: Vec<f64>,
    /// Covariance estimator.
    pub cov_type: CovarianceType,
    /// k-class parameter.
    pub kappa: f64,
    /// Structural residuals `y - Xβ`.
    pub residuals: Vec<f64>,
    /// Number of observations.
    pub n_obs: usize,
    /// Number of excluded instruments.
    pub n_instruments: usize,
    /// `1 - SSR/TSS` with structural residuals.
    pub r_squared: f64,
    /// Adjusted R².
    pub adj_r_squared: f64,
    /// `sqrt(SSR / (n - k))`.
    pub residual_se: f64,
    /// Wald F of the non-constant regressors.
    pub f_stat: Option<f64>,
    /// First-stage diagnostics, one per endogenous regressor.
    pub first_stage: Vec<FirstStageResult>,
    /// Wooldridge score over-identification test.
    pub wooldridge: OverIdTest,
    /// Sargan over-identification test.
    pub sargan: OverIdTest,
}

/// Fit a k-class IV regression.
///
/// - `exog`: included exogenous regressors (add the intercept here if wanted).
/// - `endog`: endogenous regressors (at least one).
/// - `instruments`: excluded instruments (at least as many as `endog`).
pub fn iv_fit(
    y: &[f64],
    exog: &Design,
    endog: &Design,
    instruments: &Design,
    dependent: &str,
    estimator: IvEstimator,
    cov_type: CovarianceType,
) -> Result<IvResult> {
    let y_vec = validate_y(y, exog)?;
    let n = y.len();
    if endog.n() != n || instruments.n() != n {
        return Err(Error::Validation(format!(
            "row mismatch: y has {}, endog {}, instruments {}",
            n,
            endog.n(),
            instruments.n()
        )));
    }
    let (k_endog, m) = (endog.k(), instruments.k());
    if k_endog == 0 {
        return Err(Error::Validation("Must have at least 1 endogenous regressor".into()));
    }
    if m < k_endog {
        return Err(Error::Validation(format!(
            "Under-identified: {} instruments < {} endogenous regressors",
            m, k_endog
        )));
    }
    let x = exog.hstack(endog)?;
    let k = x.k();
    if n <= exog.k() + m {
        return Err(Error::Validation(format!(
            "too few observations ({}) for {} instruments",
            n,
            exog.k() + m
        )));
    }

    let exog_m = exog.to_matrix();
    let endog_m = endog.to_matrix();
    let instr_m = instruments.to_matrix();
    let x_m = x.to_matrix();
    let z_full = hcat(&exog_m, &instr_m);
    require_full_rank(&x_m, x.names(), "IV regressors [exog | endog]")?;
    let z_names = exog.hstack(instruments)?;
    require_full_rank(&z_full, z_names.names(), "IV instruments [exog | instruments]")?;

    let ztz_inv = invert(z_full.transpose() * &z_full, "Z'Z")?;
    let ztx = z_full.transpose() * &x_m;
    let zty = z_full.transpose() * &y_vec;
    let pzx_coef = &ztz_inv * &ztx; // P_Z X = Z · pzx_coef
    let xpzx = ztx.transpose() * &pzx_coef;
    let xpzy = ztx.transpose() * (&ztz_inv * &zty);

    let kappa = match estimator {
        IvEstimator::TwoSls => 1.0,
        IvEstimator::Liml => liml_kappa(&y_vec, &exog_m, &endog_m, &z_full)?,
    };

    let xtx = x_m.transpose() * &x_m;
    let xty = x_m.transpose() * &y_vec;
    let bread = &xtx * (1.0 - kappa) + &xpzx * kappa;
    let rhs = &xty * (1.0 - kappa) + &xpzy * kappa;
    let bread_inv = invert(bread, "IV bread matrix")?;
    let beta = &bread_inv * rhs;
    let coefficients: Vec<f64> = beta.iter().copied().collect();
    if coefficients.iter().any(|b| !b.is_finite()) {
        return Err(Error::Computation("non-finite IV estimates".into()));
    }

    let resid = &y_vec - &x_m * &beta;
    let x_eff = &x_m * (1.0 - kappa) + (&z_full * &pzx_coef) * kappa;
    let cov = covariance(&x_eff, &resid, &bread_inv, cov_type, n as f64)?;
    let tests = coefficient_tests(&coefficients, &cov, None)?;

    let ssr = resid.norm_squared();
    let has_const = exog.has_constant();
    let tss = total_sum_of_squares(y, has_const);
    let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { 0.0 };
    let df_resid = (n - k) as f64;
    let k_const = if has_const { 1.0 } else { 0.0 };
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - k_const) / df_resid;
    let (f_stat, _) = joint_f(&coefficients, &cov, &slope_indices(&x), df_resid)?;

    let first_stage = first_stage_diagnostics(&exog_m, &endog_m, endog.names(), &z_full, &ztz_inv, m)?;
    let wooldridge = wooldridge_score(&resid, &exog_m, &endog_m, &instr_m)?;
    let sargan = sargan(&resid, &exog_m, k_endog, &instr_m)?;

    tracing::debug!(
        dependent,
        estimator = estimator.label(),
        n,
        k,
        kappa,
        "IV fit"
    );

    Ok(IvResult {
        dependent: dependent.to_string(),
        estimator,
        names: x.names().to_vec(),
        coefficients,
        se: tests.se,
        statistics: tests.statistics,
        p_values: tests.p_values,
        covariance: row_major(&cov),
        cov_type,
        kappa,
        residuals: resid.iter().copied().collect(),
        n_obs: n,
        n_instruments: m,
        r_squared,
        adj_r_squared,
        residual_se: (ssr / df_resid).sqrt(),
        f_stat,
        first_stage,
        wooldridge,
        sargan,
    })
}

/// Smallest eigenvalue of `B^{-1/2} A B^{-1/2}` with `A = W'M_X W`, `B = W'M_Z W`.
fn liml_kappa(
    y: &DVector<f64>,
    exog: &DMatrix<f64>,
    endog: &DMatrix<f64>,
    z_full: &DMatrix<f64>,
) -> Result<f64> {
    let w = hcat(&DMatrix::from_column_slice(y.len(), 1, y.as_slice()), endog);
    let a = residual_cross_product(&w, exog)?;
    let b = residual_cross_product(&w, z_full)?;

    let chol = b
        .cholesky()
        .ok_or_else(|| Error::Computation("LIML: W'M_Z W is not positive definite".into()))?;
    let l = chol.l();
    let l_inv_a = l
        .solve_lower_triangular(&a)
        .ok_or_else(|| Error::Computation("LIML: triangular solve failed".into()))?;
    let c = l
        .solve_lower_triangular(&l_inv_a.transpose())
        .ok_or_else(|| Error::Computation("LIML: triangular solve failed".into()))?;
    let c = (&c + c.transpose()) * 0.5;

    SymmetricEigen::new(c)
        .eigenvalues
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or_else(|| Error::Computation("LIML: empty eigenvalue set".into()))
}

/// `W'M_B W = W'W - (B'W)'(B'B)⁻¹(B'W)`.
fn residual_cross_product(w: &DMatrix<f64>, basis: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let wtw = w.transpose() * w;
    if basis.ncols() == 0 {
        return Ok(wtw);
    }
    let btw = basis.transpose() * w;
    let btb_inv = invert(basis.transpose() * basis, "B'B")?;
    Ok(wtw - btw.transpose() * btb_inv * btw)
}

fn first_stage_diagnostics(
    exog: &DMatrix<f64>,
    endog: &DMatrix<f64>,
    endog_names: &[String],
    z_full: &DMatrix<f64>,
    ztz_inv: &DMatrix<f64>,
    m: usize,
) -> Result<Vec<FirstStageResult>> {
    let n = endog.nrows();
    let k_full_z = z_full.ncols();
    let k_endog = endog.ncols();
    let exog_inv = if exog.ncols() > 0 {
        Some(invert(exog.transpose() * exog, "X_exog'X_exog")?)
    } else {
        None
    };

    let mut out = Vec::with_capacity(k_endog);
    for (e, name) in endog_names.iter().enumerate() {
        let target = endog.column(e).into_owned();
        let gamma = ztz_inv * (z_full.transpose() * &target);
        let rss_fs = (&target - z_full * gamma).norm_squared();

        let mean = target.mean();
        let tss_fs: f64 = target.iter().map(|v| (v - mean).powi(2)).sum();
        let r_squared = if tss_fs > 0.0 { 1.0 - rss_fs / tss_fs } else { 0.0 };

        // Restricted model drops the excluded instruments.
        let rss_restricted = match &exog_inv {
            Some(inv) => (&target - exog * (inv * (exog.transpose() * &target))).norm_squared(),
            None => target.norm_squared(),
        };

        let f_stat = if rss_fs > 0.0 && n > k_full_z {
            ((rss_restricted - rss_fs) / m as f64) / (rss_fs / (n - k_full_z) as f64)
        } else {
            f64::NAN
        };
        let partial_r_squared =
            if rss_restricted > 0.0 { (rss_restricted - rss_fs) / rss_restricted } else { 0.0 };

        // Stock–Yogo 10% critical values, one endogenous regressor.
        let stock_yogo_cv = match (k_endog, m) {
            (1, 1) => 16.38,
            (1, 2) => 19.93,
            (1, 3) => 22.30,
            _ => 10.0,
        };

        out.push(FirstStageResult {
            endog: name.clone(),
            f_stat,
            r_squared,
            partial_r_squared,
            passes_stock_yogo_10: f_stat > stock_yogo_cv,
        });
    }
    Ok(out)
}

impl IvResult {
    /// Sum of squared structural residuals.
    pub fn ssr(&self) -> f64 {
        self.residuals.iter().map(|e| e * e).sum()
    }
}

impl FittedModel for IvResult {
    fn dependent(&self) -> &str {
        &self.dependent
    }
    fn estimator_label(&self) -> &str {
        self.estimator.label()
    }
    fn covariance_label(&self) -> &str {
        match self.cov_type {
            CovarianceType::Unadjusted => "unadjusted",
            CovarianceType::HC0 => "robust",
            other => other.label(),
        }
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
    fn overid(&self) -> Option<OverIdTest> {
        Some(self.wooldridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn col(name: &str, v: Vec<f64>) -> (String, Vec<f64>) {
        (name.to_string(), v)
    }

    /// Endogenous design: x depends on z1, z2 and on the structural error u.
    fn endogenous_sample(n: usize) -> (Vec<f64>, Design, Design, Design) {
        let mut y = Vec::with_capacity(n);
        let (mut x, mut z1, mut z2) = (Vec::new(), Vec::new(), Vec::new());
        for i in 0..n {
            let t = i as f64;
            let a = (t * 0.7).sin();
            let b = (t * 1.3).cos();
            let u = 0.5 * (t * 2.9).sin();
            let xi = 1.0 + 0.8 * a + 0.6 * b + u + 0.2 * (t * 0.31).cos();
            y.push(2.0 + 1.5 * xi + u);
            x.push(xi);
            z1.push(a);
            z2.push(b);
        }
        let exog = Design::empty(n).with_intercept();
        let endog = Design::from_columns(n, vec![col("x", x)]).unwrap();
        let instr = Design::from_columns(n, vec![col("z1", z1), col("z2", z2)]).unwrap();
        (y, exog, endog, instr)
    }

    #[test]
    fn test_iv_2sls_exact_identification() {
        // y = 1 + 2x with x = z / 2 and no error: IV recovers the line exactly.
        let n = 100;
        let z: Vec<f64> = (0..n).map(|i| i as f64 / 10.0).collect();
        let x: Vec<f64> = z.iter().map(|v| 0.5 * v).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        let exog = Design::empty(n).with_intercept();
        let endog = Design::from_columns(n, vec![col("x", x)]).unwrap();
        let instr = Design::from_columns(n, vec![col("z", z)]).unwrap();

        let res =
            iv_fit(&y, &exog, &endog, &instr, "y", IvEstimator::TwoSls, CovarianceType::HC0).unwrap();
        assert_eq!(res.n_obs, n);
        assert_eq!(res.names, vec!["Intercept".to_string(), "x".to_string()]);
        assert!((res.coefficients[0] - 1.0).abs() < 1e-6, "intercept={}", res.coefficients[0]);
        assert!((res.coefficients[1] - 2.0).abs() < 1e-6, "beta={}", res.coefficients[1]);
        assert!(res.first_stage[0].r_squared > 0.99);
        assert_eq!(res.wooldridge, OverIdTest::NotApplicable);
    }

    #[test]
    fn liml_equals_2sls_when_exactly_identified() {
        let (y, exog, endog, instr) = endogenous_sample(80);
        let z1 = Design::from_columns(80, vec![col("z1", instr.column(0))]).unwrap();
        let tsls =
            iv_fit(&y, &exog, &endog, &z1, "y", IvEstimator::TwoSls, CovarianceType::HC0).unwrap();
        let liml = iv_fit(&y, &exog, &endog, &z1, "y", IvEstimator::Liml, CovarianceType::HC0).unwrap();
        assert_abs_diff_eq!(liml.kappa, 1.0, epsilon = 1e-8);
        for (a, b) in tsls.coefficients.iter().zip(&liml.coefficients) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn overidentified_diagnostics() {
        let (y, exog, endog, instr) = endogenous_sample(120);
        let res = iv_fit(&y, &exog, &endog, &instr, "y", IvEstimator::TwoSls, CovarianceType::HC0).unwrap();
        match res.wooldridge {
            OverIdTest::Test { statistic, df, p_value } => {
                assert_eq!(df, 1);
                assert!(statistic >= -1e-9);
                assert!((0.0..=1.0).contains(&p_value), "p={p_value}");
            }
            OverIdTest::NotApplicable => panic!("model is over-identified"),
        }
        assert!(res.sargan.p_value().is_some());
        assert!(res.first_stage[0].f_stat > 10.0);
        assert_eq!(res.covariance_label(), "robust");
        assert_eq!(res.estimator_label(), "IV-2SLS");
    }

    #[test]
    fn liml_kappa_at_least_one() {
        let (y, exog, endog, instr) = endogenous_sample(120);
        let res = iv_fit(&y, &exog, &endog, &instr, "y", IvEstimator::Liml, CovarianceType::HC1).unwrap();
        assert!(res.kappa >= 1.0 - 1e-10, "kappa={}", res.kappa);
        assert!((res.coefficients[1] - 1.5).abs() < 0.5);
    }

    #[test]
    fn collinear_instruments_are_computation_error() {
        let (y, exog, endog, instr) = endogenous_sample(120);
        let z3: Vec<f64> = (0..120).map(|i| 0.3 * instr.row(i)[0] + 1.7 * instr.row(i)[1]).collect();
        let instr = instr.hstack(&Design::from_columns(120, vec![col("z3", z3)]).unwrap()).unwrap();
        for estimator in [IvEstimator::TwoSls, IvEstimator::Liml] {
            let err = iv_fit(&y, &exog, &endog, &instr, "y", estimator, CovarianceType::HC0).unwrap_err();
            assert!(matches!(&err, Error::Computation(msg) if msg.contains("z1, z2, z3")), "{err}");
        }
    }

    #[test]
    fn test_iv_under_identified() {
        let n = 5;
        let exog = Design::empty(n).with_intercept();
        let endog = Design::from_columns(
            n,
            vec![col("a", vec![1.0, 2.0, 2.0, 3.0, 5.0]), col("b", vec![3.0, 1.0, 4.0, 1.0, 5.0])],
        )
        .unwrap();
        let instr = Design::from_columns(n, vec![col("z", vec![0.5, 1.0, 1.5, 2.0, 0.1])]).unwrap();
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let res = iv_fit(&y, &exog, &endog, &instr, "y", IvEstimator::TwoSls, CovarianceType::HC0);
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[test]
    fn test_iv_validation() {
        let exog = Design::empty(0);
        assert!(
            iv_fit(&[], &exog, &exog, &exog, "y", IvEstimator::TwoSls, CovarianceType::HC0).is_err()
        );
    }
}

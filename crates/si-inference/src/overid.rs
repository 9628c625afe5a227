//! Over-identification tests for IV models.
//!
//! Both tests are χ² with `#instruments - #endogenous` degrees of freedom and
//! are only defined for over-identified models; an exactly identified model
//! yields [`OverIdTest::NotApplicable`].
//!
//! # References
//!
//! - Wooldridge (1995), "Score diagnostics for linear models estimated by two
//!   stage least squares."
//! - Sargan (1958), "The estimation of economic relationships using
//!   instrumental variables."

use nalgebra::{DMatrix, DVector};
use si_core::{OverIdTest, Result};

use crate::design::{annihilate, project};
use crate::dist::chi2_sf;

/// Wooldridge's heteroskedasticity-robust score test.
///
/// The first `m - p` excluded instruments are partialled out of the
/// exogenous regressors and the fitted endogenous regressors; the statistic
/// is `n - SSR` from the uncentred regression of a unit vector on the
/// products of those residuals with the structural residuals.
pub fn wooldridge_score(
    residuals: &DVector<f64>,
    exog: &DMatrix<f64>,
    endog: &DMatrix<f64>,
    instruments: &DMatrix<f64>,
) -> Result<OverIdTest> {
    let n = residuals.len();
    let (n_endog, n_instr) = (endog.ncols(), instruments.ncols());
    if n_instr <= n_endog {
        return Ok(OverIdTest::NotApplicable);
    }
    let df = n_instr - n_endog;

    let z_full = hcat(exog, instruments);
    let endog_hat = project(endog, &z_full)?;
    let q = instruments.columns(0, df).into_owned();
    let q_res = annihilate(&q, &hcat(exog, &endog_hat))?;

    let mut scores = q_res;
    for i in 0..n {
        for j in 0..df {
            scores[(i, j)] *= residuals[i];
        }
    }
    let ones = DMatrix::from_element(n, 1, 1.0);
    let ssr = annihilate(&ones, &scores)?.norm_squared();
    let statistic = n as f64 - ssr;
    Ok(OverIdTest::Test { statistic, df, p_value: chi2_sf(statistic, df)? })
}

/// Sargan's nR² test of the structural residuals on all instruments.
pub fn sargan(
    residuals: &DVector<f64>,
    exog: &DMatrix<f64>,
    n_endog: usize,
    instruments: &DMatrix<f64>,
) -> Result<OverIdTest> {
    let n_instr = instruments.ncols();
    if n_instr <= n_endog {
        return Ok(OverIdTest::NotApplicable);
    }
    let df = n_instr - n_endog;
    let e = DMatrix::from_column_slice(residuals.len(), 1, residuals.as_slice());
    let ee = e.norm_squared();
    let unexplained = annihilate(&e, &hcat(exog, instruments))?.norm_squared();
    let statistic = if ee > 0.0 { residuals.len() as f64 * (1.0 - unexplained / ee) } else { 0.0 };
    Ok(OverIdTest::Test { statistic, df, p_value: chi2_sf(statistic, df)? })
}

pub(crate) fn hcat(a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, ka, kb) = (a.nrows().max(b.nrows()), a.ncols(), b.ncols());
    DMatrix::from_fn(n, ka + kb, |i, j| if j < ka { a[(i, j)] } else { b[(i, j - ka)] })
}

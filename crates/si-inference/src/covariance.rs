//! Parameter covariance estimators.
//!
//! All estimators share the sandwich form `V = B⁻¹ M B⁻¹`, where `B` is the
//! bread (`X'X` for OLS, `X̃'X` for k-class IV) and `M = Σ_i ω_i e_i² x̃_i x̃_i'`
//! is the meat built from the effective regressors `x̃`.
//!
//! # References
//!
//! - White (1980), "A heteroskedasticity-consistent covariance matrix estimator."
//! - MacKinnon & White (1985), "Some heteroskedasticity-consistent covariance
//!   matrix estimators with improved finite sample properties."

use nalgebra::{DMatrix, DVector};
use si_core::{CovarianceType, Error, Result};

/// Diagonal of the hat matrix: `h_i = x_i' B⁻¹ x_i`.
pub fn leverage(x: &DMatrix<f64>, bread_inv: &DMatrix<f64>) -> Vec<f64> {
    let xb = x * bread_inv;
    (0..x.nrows()).map(|i| xb.row(i).dot(&x.row(i))).collect()
}

/// Parameter covariance for the requested estimator.
///
/// - `x`: effective regressors (n × k).
/// - `residuals`: structural residuals (length n).
/// - `bread_inv`: inverse bread (k × k).
/// - `sigma2_divisor`: divisor of the residual sum of squares for the
///   classical estimator (`n - k` for OLS).
pub fn covariance(
    x: &DMatrix<f64>,
    residuals: &DVector<f64>,
    bread_inv: &DMatrix<f64>,
    cov_type: CovarianceType,
    sigma2_divisor: f64,
) -> Result<DMatrix<f64>> {
    let n = x.nrows();
    let k = x.ncols();
    if residuals.len() != n {
        return Err(Error::Validation(format!(
            "residuals length ({}) != n ({})",
            residuals.len(),
            n
        )));
    }

    if cov_type == CovarianceType::Unadjusted {
        let ssr = residuals.norm_squared();
        let sigma2 = if sigma2_divisor > 0.0 { ssr / sigma2_divisor } else { f64::NAN };
        return Ok(bread_inv * sigma2);
    }

    let weights: Vec<f64> = match cov_type {
        CovarianceType::HC2 | CovarianceType::HC3 => {
            let h = leverage(x, bread_inv);
            let power = if cov_type == CovarianceType::HC2 { 1 } else { 2 };
            h.iter().map(|&hi| 1.0 / (1.0 - hi).powi(power)).collect()
        }
        _ => vec![1.0; n],
    };

    // Meat: Σ ω_i e_i² x_i x_i'
    let mut meat = DMatrix::zeros(k, k);
    for i in 0..n {
        let w = weights[i] * residuals[i] * residuals[i];
        for a in 0..k {
            let xa = x[(i, a)] * w;
            for b in 0..k {
                meat[(a, b)] += xa * x[(i, b)];
            }
        }
    }

    let mut v = bread_inv * meat * bread_inv;
    if cov_type == CovarianceType::HC1 {
        let (n_f, k_f) = (n as f64, k as f64);
        v *= if n_f > k_f { n_f / (n_f - k_f) } else { f64::NAN };
    }
    Ok(v)
}

/// Standard errors from a covariance matrix.
pub fn std_errors(cov: &DMatrix<f64>) -> Vec<f64> {
    (0..cov.nrows()).map(|j| cov[(j, j)].max(0.0).sqrt()).collect()
}

/// Wald statistic `β_S' V_SS⁻¹ β_S` for the joint hypothesis `β_S = 0`.
pub fn wald_statistic(coefficients: &[f64], cov: &DMatrix<f64>, subset: &[usize]) -> Result<f64> {
    let q = subset.len();
    if q == 0 {
        return Err(Error::Validation("Wald test needs at least one restriction".into()));
    }
    let b = DVector::from_iterator(q, subset.iter().map(|&j| coefficients[j]));
    let v = DMatrix::from_fn(q, q, |a, c| cov[(subset[a], subset[c])]);
    let v_inv = v
        .try_inverse()
        .ok_or_else(|| Error::Computation("restricted covariance is singular".into()))?;
    Ok((b.transpose() * v_inv * &b)[(0, 0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Intercept-only model on y = [1, 2, 3, 6]: e = [-2, -1, 0, 3], Σe² = 14, h_i = 1/4.
    fn setup() -> (DMatrix<f64>, DVector<f64>, DMatrix<f64>) {
        let x = DMatrix::from_element(4, 1, 1.0);
        let e = DVector::from_vec(vec![-2.0, -1.0, 0.0, 3.0]);
        let bread_inv = DMatrix::from_element(1, 1, 0.25);
        (x, e, bread_inv)
    }

    #[test]
    fn closed_form_intercept_only() {
        let (x, e, b) = setup();
        let v = |c| covariance(&x, &e, &b, c, 3.0).unwrap()[(0, 0)];
        assert_abs_diff_eq!(v(CovarianceType::Unadjusted), 14.0 / 3.0 / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v(CovarianceType::HC0), 14.0 / 16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v(CovarianceType::HC1), 14.0 / 16.0 * 4.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v(CovarianceType::HC2), 14.0 / 0.75 / 16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v(CovarianceType::HC3), 14.0 / 0.5625 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn leverage_sums_to_rank() {
        let (x, _, b) = setup();
        let h = leverage(&x, &b);
        assert_abs_diff_eq!(h.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn wald_single_restriction_is_squared_z() {
        let cov = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 0.25]);
        let w = wald_statistic(&[1.0, 1.5], &cov, &[1]).unwrap();
        assert_abs_diff_eq!(w, 9.0, epsilon = 1e-12);
        assert!(wald_statistic(&[1.0], &cov, &[]).is_err());
    }

    #[test]
    fn residual_length_checked() {
        let (x, _, b) = setup();
        let e = DVector::from_vec(vec![1.0]);
        assert!(covariance(&x, &e, &b, CovarianceType::HC0, 3.0).is_err());
    }
}

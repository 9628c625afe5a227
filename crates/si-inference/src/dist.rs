//! Reference distributions for test statistics.

use si_core::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

/// Two-sided p-value of a standard-normal statistic.
pub fn normal_two_sided(z: f64) -> f64 {
    if !z.is_finite() {
        return f64::NAN;
    }
    statrs::function::erf::erfc(z.abs() / std::f64::consts::SQRT_2)
}

/// Two-sided p-value of a Student-t statistic with `df` degrees of freedom.
pub fn t_two_sided(t: f64, df: f64) -> Result<f64> {
    if !t.is_finite() {
        return Ok(f64::NAN);
    }
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| Error::Computation(e.to_string()))?;
    Ok(2.0 * dist.sf(t.abs()))
}

/// Upper-tail probability of a χ² statistic.
pub fn chi2_sf(stat: f64, df: usize) -> Result<f64> {
    if !stat.is_finite() {
        return Ok(f64::NAN);
    }
    let dist = ChiSquared::new(df as f64).map_err(|e| Error::Computation(e.to_string()))?;
    Ok(dist.sf(stat.max(0.0)))
}

/// Upper-tail probability of an F statistic with `(d1, d2)` degrees of freedom.
pub fn f_sf(stat: f64, d1: f64, d2: f64) -> Result<f64> {
    if !stat.is_finite() {
        return Ok(f64::NAN);
    }
    let dist = FisherSnedecor::new(d1, d2).map_err(|e| Error::Computation(e.to_string()))?;
    Ok(dist.sf(stat.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normal_reference_values() {
        assert_abs_diff_eq!(normal_two_sided(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_two_sided(1.959963984540054), 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(normal_two_sided(-2.5758293035489), 0.01, epsilon = 1e-9);
    }

    #[test]
    fn t_approaches_normal() {
        let p = t_two_sided(1.96, 1e6).unwrap();
        assert_abs_diff_eq!(p, normal_two_sided(1.96), epsilon = 1e-5);
        // t(1) is Cauchy: P(|T| > 1) = 0.5
        assert_abs_diff_eq!(t_two_sided(1.0, 1.0).unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn chi2_one_df() {
        // χ²(1) at 3.841459 has upper tail 0.05
        assert_abs_diff_eq!(chi2_sf(3.841458820694124, 1).unwrap(), 0.05, epsilon = 1e-8);
        assert_abs_diff_eq!(chi2_sf(-0.5, 2).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn f_matches_squared_t() {
        let p_t = t_two_sided(2.0, 12.0).unwrap();
        let p_f = f_sf(4.0, 1.0, 12.0).unwrap();
        assert_abs_diff_eq!(p_t, p_f, epsilon = 1e-8);
    }
}

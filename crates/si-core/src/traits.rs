//! Core traits
//!
//! The table renderer in `si-report` depends only on [`FittedModel`], never on
//! the concrete OLS or IV result types in `si-inference`. Any estimator that
//! can answer these questions can be placed in a comparison table.

use crate::types::OverIdTest;

/// Read-only view of a fitted linear model.
pub trait FittedModel {
    /// Dependent variable name.
    fn dependent(&self) -> &str;

    /// Estimator label ("OLS", "IV-2SLS", "IV-LIML", ...).
    fn estimator_label(&self) -> &str;

    /// Covariance estimator label ("HC3", "robust", ...).
    fn covariance_label(&self) -> &str;

    /// Parameter names, in coefficient order.
    fn parameter_names(&self) -> &[String];

    /// Point estimates.
    fn coefficients(&self) -> &[f64];

    /// Standard errors.
    fn std_errors(&self) -> &[f64];

    /// Two-sided p-values.
    fn p_values(&self) -> &[f64];

    /// Number of observations used.
    fn n_obs(&self) -> usize;

    /// Coefficient of determination.
    fn r_squared(&self) -> f64;

    /// Adjusted R².
    fn adj_r_squared(&self) -> f64;

    /// Residual standard error, where defined.
    fn residual_std_error(&self) -> Option<f64> {
        None
    }

    /// Joint significance statistic of the slopes, where defined.
    fn f_statistic(&self) -> Option<f64> {
        None
    }

    /// Over-identification diagnostic; `None` for estimators without one.
    fn overid(&self) -> Option<OverIdTest> {
        None
    }

    /// Index of a named parameter.
    fn index_of(&self, name: &str) -> Option<usize> {
        self.parameter_names().iter().position(|n| n == name)
    }

    /// `(estimate, std error, p-value)` of a named parameter.
    fn coefficient(&self, name: &str) -> Option<(f64, f64, f64)> {
        let i = self.index_of(name)?;
        Some((self.coefficients()[i], self.std_errors()[i], self.p_values()[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        names: Vec<String>,
    }

    impl FittedModel for Fixed {
        fn dependent(&self) -> &str {
            "y"
        }
        fn estimator_label(&self) -> &str {
            "OLS"
        }
        fn covariance_label(&self) -> &str {
            "HC3"
        }
        fn parameter_names(&self) -> &[String] {
            &self.names
        }
        fn coefficients(&self) -> &[f64] {
            &[1.0, 2.0]
        }
        fn std_errors(&self) -> &[f64] {
            &[0.5, 0.25]
        }
        fn p_values(&self) -> &[f64] {
            &[0.04, 0.001]
        }
        fn n_obs(&self) -> usize {
            10
        }
        fn r_squared(&self) -> f64 {
            0.9
        }
        fn adj_r_squared(&self) -> f64 {
            0.89
        }
    }

    #[test]
    fn lookup_by_name() {
        let m = Fixed { names: vec!["Intercept".into(), "x".into()] };
        assert_eq!(m.coefficient("x"), Some((2.0, 0.25, 0.001)));
        assert_eq!(m.coefficient("z"), None);
        assert!(m.overid().is_none());
        assert!(m.f_statistic().is_none());
    }
}

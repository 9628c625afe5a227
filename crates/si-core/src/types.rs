//! Common data types shared by estimation and reporting

use std::fmt;

use serde::{Deserialize, Serialize};

/// Covariance estimator for coefficient standard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CovarianceType {
    /// Classical homoskedastic `σ²(X'X)⁻¹`.
    Unadjusted,
    /// White heteroskedasticity-robust sandwich.
    HC0,
    /// HC0 scaled by `n / (n - k)`.
    HC1,
    /// Squared residuals scaled by `1 / (1 - h_ii)`.
    HC2,
    /// Squared residuals scaled by `1 / (1 - h_ii)²`.
    HC3,
}

impl CovarianceType {
    /// Short label used in tables ("nonrobust", "HC3", ...).
    pub fn label(self) -> &'static str {
        match self {
            CovarianceType::Unadjusted => "nonrobust",
            CovarianceType::HC0 => "HC0",
            CovarianceType::HC1 => "HC1",
            CovarianceType::HC2 => "HC2",
            CovarianceType::HC3 => "HC3",
        }
    }

    /// Whether this is a heteroskedasticity-robust estimator.
    ///
    /// Robust fits report normal-approximation p-values; the classical
    /// estimator uses Student-t with residual degrees of freedom.
    pub fn is_robust(self) -> bool {
        !matches!(self, CovarianceType::Unadjusted)
    }
}

impl fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Over-identification diagnostic attached to an IV fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverIdTest {
    /// Test statistic with its χ² reference distribution.
    Test {
        /// Test statistic.
        statistic: f64,
        /// Degrees of freedom (`#instruments - #endogenous`).
        df: usize,
        /// Upper-tail p-value.
        p_value: f64,
    },
    /// The model is exactly identified; there is nothing to test.
    NotApplicable,
}

impl OverIdTest {
    /// p-value, if the test applies.
    pub fn p_value(&self) -> Option<f64> {
        match self {
            OverIdTest::Test { p_value, .. } => Some(*p_value),
            OverIdTest::NotApplicable => None,
        }
    }
}

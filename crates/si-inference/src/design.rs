//! Named, dense design matrices.

use nalgebra::{DMatrix, DVector};
use si_core::{Error, Result};

/// Conventional name of the constant column.
pub const INTERCEPT: &str = "Intercept";

/// Dense row-major design matrix with one name per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    n: usize,
    names: Vec<String>,
    data: Vec<f64>, // length n*k, row-major
}

impl Design {
    /// Design with `n` rows and no columns.
    pub fn empty(n: usize) -> Self {
        Self { n, names: Vec::new(), data: Vec::new() }
    }

    /// Build from named columns, all of length `n`.
    pub fn from_columns(n: usize, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let k = columns.len();
        for (name, col) in &columns {
            if col.len() != n {
                return Err(Error::Validation(format!(
                    "column '{}' has length {}, expected {}",
                    name,
                    col.len(),
                    n
                )));
            }
            if col.iter().any(|v| !v.is_finite()) {
                return Err(Error::Validation(format!("column '{name}' must contain only finite values")));
            }
        }
        let mut data = Vec::with_capacity(n * k);
        for i in 0..n {
            for (_, col) in &columns {
                data.push(col[i]);
            }
        }
        Ok(Self { n, names: columns.into_iter().map(|(name, _)| name).collect(), data })
    }

    /// Copy of this design with a leading constant column named [`INTERCEPT`].
    pub fn with_intercept(&self) -> Self {
        let k = self.k();
        let mut data = Vec::with_capacity(self.n * (k + 1));
        for i in 0..self.n {
            data.push(1.0);
            data.extend_from_slice(self.row(i));
        }
        let mut names = Vec::with_capacity(k + 1);
        names.push(INTERCEPT.to_string());
        names.extend(self.names.iter().cloned());
        Self { n: self.n, names, data }
    }

    /// Horizontal concatenation `[self | other]`.
    pub fn hstack(&self, other: &Design) -> Result<Self> {
        if self.n != other.n {
            return Err(Error::Validation(format!(
                "cannot stack designs with {} and {} rows",
                self.n, other.n
            )));
        }
        let k = self.k() + other.k();
        let mut data = Vec::with_capacity(self.n * k);
        for i in 0..self.n {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        let mut names = self.names.clone();
        names.extend(other.names.iter().cloned());
        Ok(Self { n: self.n, names, data })
    }

    /// Number of rows.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of columns.
    pub fn k(&self) -> usize {
        self.names.len()
    }

    /// Column names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let k = self.k();
        &self.data[i * k..(i + 1) * k]
    }

    /// Column `j` as a vector.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.n).map(|i| self.data[i * self.k() + j]).collect()
    }

    /// Whether some column is a non-zero constant.
    pub fn has_constant(&self) -> bool {
        self.n > 0
            && (0..self.k()).any(|j| {
                let first = self.data[j];
                first != 0.0 && (0..self.n).all(|i| self.data[i * self.k() + j] == first)
            })
    }

    /// Dense `n × k` matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.n, self.k(), &self.data)
    }
}

/// Validate the response against a design.
pub(crate) fn validate_y(y: &[f64], x: &Design) -> Result<DVector<f64>> {
    if y.is_empty() {
        return Err(Error::Validation("y must be non-empty".into()));
    }
    if y.len() != x.n() {
        return Err(Error::Validation(format!(
            "y has wrong length: expected n={}, got {}",
            x.n(),
            y.len()
        )));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(Error::Validation("y must contain only finite values".into()));
    }
    Ok(DVector::from_column_slice(y))
}

/// Numerical rank: singular values above `max(n, k) · ε · σ_max`.
pub(crate) fn numerical_rank(m: &DMatrix<f64>) -> usize {
    if m.is_empty() {
        return 0;
    }
    let sv = m.singular_values();
    let tol = m.nrows().max(m.ncols()) as f64 * f64::EPSILON * sv.max();
    sv.iter().filter(|s| **s > tol).count()
}

/// Fail with [`Error::Computation`] when the columns of `m` are linearly dependent.
///
/// Gram-matrix inversion only fails on exactly zero pivots.
pub(crate) fn require_full_rank(m: &DMatrix<f64>, names: &[String], what: &str) -> Result<()> {
    let rank = numerical_rank(m);
    if rank < m.ncols() {
        return Err(Error::Computation(format!(
            "{what} is perfectly collinear: rank {rank} < {} columns [{}]",
            m.ncols(),
            names.join(", ")
        )));
    }
    Ok(())
}

/// `(A)⁻¹`, reporting which matrix was singular.
pub(crate) fn invert(a: DMatrix<f64>, what: &str) -> Result<DMatrix<f64>> {
    a.try_inverse().ok_or_else(|| Error::Computation(format!("{what} is singular")))
}

/// Least-squares projection of the columns of `a` onto the span of `basis`.
///
/// An empty basis projects everything to zero.
pub(crate) fn project(a: &DMatrix<f64>, basis: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if basis.ncols() == 0 {
        return Ok(DMatrix::zeros(a.nrows(), a.ncols()));
    }
    let gram_inv = invert(basis.transpose() * basis, "projection basis")?;
    Ok(basis * (gram_inv * (basis.transpose() * a)))
}

/// Residuals of `a` after projecting onto `basis`.
pub(crate) fn annihilate(a: &DMatrix<f64>, basis: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    Ok(a - project(a, basis)?)
}

//! # si-inference
//!
//! Closed-form linear estimators for the replication toolkit.
//!
//! This crate provides:
//! - OLS with classical and HC0–HC3 heteroskedasticity-robust covariances
//! - k-class instrumental variables (2SLS, LIML) with first-stage diagnostics
//! - Over-identification tests (Wooldridge score, Sargan)
//!
//! ## Architecture
//!
//! Every result type implements [`si_core::FittedModel`], so the reporting
//! layer formats OLS and IV fits through the same interface and never looks
//! at estimator internals.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Parameter covariance estimators and Wald tests.
pub mod covariance;
/// Named dense design matrices.
pub mod design;
/// Normal, Student-t, χ² and F tail probabilities.
pub mod dist;
/// Instrumental variables (k-class).
pub mod iv;
/// Ordinary least squares.
pub mod ols;
/// Over-identification tests.
pub mod overid;

pub use design::{Design, INTERCEPT};
pub use iv::{FirstStageResult, IvEstimator, IvResult, iv_fit};
pub use ols::{OlsResult, ols_fit};

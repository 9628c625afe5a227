//! # si-core
//!
//! Core types for the schooling & institutions replication toolkit.
//!
//! - [`Error`] / [`Result`]: the shared error type
//! - [`Frame`]: immutable column-oriented tabular data with missing values
//! - [`FittedModel`]: the capability set every fitted regression exposes to
//!   the table renderer
//!
//! Estimation lives in `si-inference`; reporting lives in `si-report`. Both
//! depend on this crate, never on each other's concrete result types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod frame;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use frame::{Column, Frame, RowFilter};
pub use traits::FittedModel;
pub use types::{CovarianceType, OverIdTest};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

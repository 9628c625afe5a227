//! # si-viz
//!
//! Visualization data artifacts for the replication toolkit.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Scatter panels with fitted regression lines.
pub mod scatter;

pub use scatter::{
    FIGURE_SCHEMA, FigureArtifact, FigureMeta, FitLine, PanelText, SCATTER_FIT_SCHEMA,
    ScatterFitArtifact, ScatterPoint, figure_artifact, scatter_fit_artifact,
};

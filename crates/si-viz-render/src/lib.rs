//! # si-viz-render
//!
//! Draws `si-viz` figure artifacts as SVG. Input is the artifact JSON plus a
//! kind tag, so the renderer works the same on freshly built figures and on
//! artifacts read back from disk.

pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;
pub mod plots;
pub mod primitives;
pub mod text;

use config::VizConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("svg formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render an artifact JSON to an SVG string.
///
/// `kind` is `"figure"` for a multi-panel [`si_viz::FigureArtifact`] or
/// `"scatter_fit"` for a single [`si_viz::ScatterFitArtifact`].
pub fn render_svg(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    let svg = match kind {
        "figure" => {
            let art: si_viz::FigureArtifact = serde_json::from_str(artifact_json)?;
            plots::scatter::render_figure(&art, config)?
        }
        "scatter" | "scatter_fit" => {
            let art: si_viz::ScatterFitArtifact = serde_json::from_str(artifact_json)?;
            plots::scatter::render_panel(&art, config)?
        }
        other => return Err(RenderError::UnknownKind(other.to_string())),
    };
    Ok(svg)
}

/// Render an artifact JSON to bytes in the specified format.
pub fn render_to_bytes(
    artifact_json: &str,
    kind: &str,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    match format {
        "svg" => Ok(render_svg(artifact_json, kind, config)?.into_bytes()),
        other => Err(RenderError::UnknownKind(format!("format: {other}"))),
    }
}

/// Render an artifact JSON to a file; the format follows the extension.
pub fn render_to_file(
    artifact_json: &str,
    kind: &str,
    path: &std::path::Path,
    config: &VizConfig,
) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or(config.output.format.as_str());
    let bytes = render_to_bytes(artifact_json, kind, ext, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

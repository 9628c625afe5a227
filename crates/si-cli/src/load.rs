//! CSV input.

use std::path::Path;

use anyhow::{Context, Result};
use si_core::{Column, Frame};

/// Cell values read as missing.
const MISSING: [&str; 5] = ["", "NA", "NaN", "nan", "."];

fn is_missing(cell: &str) -> bool {
    MISSING.contains(&cell)
}

/// Build a column from raw cells: numeric when every non-missing cell parses
/// as a number, text otherwise.
fn infer_column(cells: Vec<String>) -> Column {
    let numeric: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| if is_missing(c) { Some(None) } else { c.parse::<f64>().ok().map(Some) })
        .collect();
    match numeric {
        Some(values) => Column::from(values),
        None => Column::from(
            cells.into_iter().map(|c| if is_missing(&c) { None } else { Some(c) }).collect::<Vec<_>>(),
        ),
    }
}

/// Read a CSV file with a header row into a [`Frame`].
pub fn read_frame(path: &Path) -> Result<Frame> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("{}: malformed record {}", path.display(), line + 1))?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let columns: Vec<(String, Column)> =
        headers.into_iter().zip(cells).map(|(name, raw)| (name, infer_column(raw))).collect();
    let frame = Frame::from_columns(columns).with_context(|| format!("invalid table {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = frame.n_rows(), columns = frame.n_cols(), "loaded table");
    Ok(frame)
}

//! Column-oriented tabular data with missing values.
//!
//! A [`Frame`] is the in-memory form of the country and region tables. It is
//! never mutated in place: filtering, selecting, renaming and patching all
//! return a new frame, so a prepared view can never leak changes back into
//! the caller's data.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::{Error, Result};

/// A single named column.
///
/// Numeric `NaN` is treated as missing, the same as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Column {
    /// Numeric values.
    Numeric(Vec<Option<f64>>),
    /// Text (categorical) values.
    Text(Vec<Option<String>>),
}

impl Column {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// True when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is missing.
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(v) => v[row].map_or(true, f64::is_nan),
            Column::Text(v) => v[row].is_none(),
        }
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    /// Text values, if this is a text column.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Text(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }

    /// Display key of the value at `row` (used for categorical grouping).
    pub fn key(&self, row: usize) -> Option<String> {
        if self.is_missing(row) {
            return None;
        }
        match self {
            Column::Numeric(v) => v[row].map(|x| format!("{x}")),
            Column::Text(v) => v[row].clone(),
        }
    }

    fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numeric(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for Column {
    fn from(values: Vec<Option<f64>>) -> Self {
        Column::Numeric(values)
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::Text(values.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<Option<String>>> for Column {
    fn from(values: Vec<Option<String>>) -> Self {
        Column::Text(values)
    }
}

/// Comparison used by a [`RowFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

/// Keep rows whose numeric `column` satisfies `op value`.
///
/// Rows with a missing value in `column` never pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFilter {
    /// Column tested.
    pub column: String,
    /// Comparison operator.
    pub op: Comparison,
    /// Right-hand side.
    pub value: f64,
}

impl RowFilter {
    /// `column < value`
    pub fn lt(column: impl Into<String>, value: f64) -> Self {
        Self { column: column.into(), op: Comparison::Less, value }
    }

    /// `column > value`
    pub fn gt(column: impl Into<String>, value: f64) -> Self {
        Self { column: column.into(), op: Comparison::Greater, value }
    }

    /// `column == value`
    pub fn eq(column: impl Into<String>, value: f64) -> Self {
        Self { column: column.into(), op: Comparison::Equal, value }
    }

    /// `column != value`
    pub fn ne(column: impl Into<String>, value: f64) -> Self {
        Self { column: column.into(), op: Comparison::NotEqual, value }
    }

    fn accepts(&self, x: f64) -> bool {
        match self.op {
            Comparison::Less => x < self.value,
            Comparison::Greater => x > self.value,
            Comparison::Equal => x == self.value,
            Comparison::NotEqual => x != self.value,
        }
    }
}

/// Immutable, ordered collection of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Frame {
    /// Empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from `(name, column)` pairs.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut frame = Frame::new();
        for (name, col) in columns {
            let name = name.into();
            if frame.has_column(&name) {
                return Err(Error::Validation(format!("duplicate column name: {name}")));
            }
            frame = frame.with_column(name, col)?;
        }
        Ok(frame)
    }

    /// Return a copy with `column` added (or replaced when the name exists).
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(Error::Validation(format!(
                "column '{}' has {} rows, frame has {}",
                name,
                column.len(),
                self.n_rows()
            )));
        }
        match self.names.iter().position(|n| *n == name) {
            Some(j) => self.columns[j] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(self)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a column named `name` exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|j| &self.columns[j])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Numeric column by name.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| Error::ColumnType { column: name.to_string(), expected: "numeric" })
    }

    /// Text column by name.
    pub fn text(&self, name: &str) -> Result<&[Option<String>]> {
        self.column(name)?
            .as_text()
            .ok_or_else(|| Error::ColumnType { column: name.to_string(), expected: "text" })
    }

    /// Numeric column as dense values. Fails if any value is missing.
    pub fn dense(&self, name: &str) -> Result<Vec<f64>> {
        let values = self.numeric(name)?;
        values
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Some(x) if !x.is_nan() => Ok(*x),
                _ => Err(Error::Validation(format!("column '{name}' has a missing value at row {i}"))),
            })
            .collect()
    }

    /// Per-row display labels of a column (missing values become empty strings).
    pub fn labels(&self, name: &str) -> Result<Vec<String>> {
        let col = self.column(name)?;
        Ok((0..col.len()).map(|i| col.key(i).unwrap_or_default()).collect())
    }

    /// Rows at the given indices, in that order.
    pub fn take_rows(&self, rows: &[usize]) -> Frame {
        Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
        }
    }

    /// Keep the rows for which `keep(row)` is true.
    pub fn filter(&self, keep: impl Fn(usize) -> bool) -> Frame {
        let rows: Vec<usize> = (0..self.n_rows()).filter(|&i| keep(i)).collect();
        self.take_rows(&rows)
    }

    /// Keep rows that are non-missing on every variable in `vars`.
    pub fn complete_cases<S: AsRef<str>>(&self, vars: &[S]) -> Result<Frame> {
        let cols = vars.iter().map(|v| self.column(v.as_ref())).collect::<Result<Vec<_>>>()?;
        Ok(self.filter(|i| cols.iter().all(|c| !c.is_missing(i))))
    }

    /// Keep rows passing every filter.
    pub fn apply_filters(&self, filters: &[RowFilter]) -> Result<Frame> {
        if filters.is_empty() {
            return Ok(self.clone());
        }
        let cols = filters
            .iter()
            .map(|f| self.numeric(&f.column))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.filter(|i| {
            filters.iter().zip(&cols).all(|(f, c)| match c[i] {
                Some(x) if !x.is_nan() => f.accepts(x),
                _ => false,
            })
        }))
    }

    /// Project onto `vars`, in that order.
    pub fn select<S: AsRef<str>>(&self, vars: &[S]) -> Result<Frame> {
        let mut out = Frame::new();
        for v in vars {
            let col = self.column(v.as_ref())?.clone();
            out = out.with_column(v.as_ref(), col)?;
        }
        Ok(out)
    }

    /// Rename columns through `(from, to)` pairs. Unlisted columns keep their name.
    pub fn rename(&self, mapping: &[(&str, &str)]) -> Result<Frame> {
        let names: Vec<String> = self
            .names
            .iter()
            .map(|n| {
                mapping
                    .iter()
                    .find(|(from, _)| from == n)
                    .map_or_else(|| n.clone(), |(_, to)| to.to_string())
            })
            .collect();
        let mut seen = HashSet::new();
        for n in &names {
            if !seen.insert(n.as_str()) {
                return Err(Error::Validation(format!("rename produces duplicate column: {n}")));
            }
        }
        Ok(Frame { names, columns: self.columns.clone() })
    }

    /// Set numeric `target` to `value` on rows whose text `key_col` equals `key`.
    ///
    /// Returns the patched frame and the number of rows changed.
    pub fn set_where(
        &self,
        key_col: &str,
        key: &str,
        target: &str,
        value: f64,
    ) -> Result<(Frame, usize)> {
        let keys = self.text(key_col)?;
        let mut values = self.numeric(target)?.to_vec();
        let mut changed = 0;
        for (i, k) in keys.iter().enumerate() {
            if k.as_deref() == Some(key) {
                values[i] = Some(value);
                changed += 1;
            }
        }
        let frame = self.clone().with_column(target, Column::Numeric(values))?;
        Ok((frame, changed))
    }

    /// 0/1 indicator columns for the levels of a categorical column.
    ///
    /// Levels are sorted; the first is dropped when `drop_first` is set so the
    /// indicators stay linearly independent of an intercept. Names are
    /// `"{column}={level}"`. Missing keys produce all-zero rows.
    pub fn dummies(&self, name: &str, drop_first: bool) -> Result<Vec<(String, Vec<f64>)>> {
        let col = self.column(name)?;
        let keys: Vec<Option<String>> = (0..col.len()).map(|i| col.key(i)).collect();
        let levels: BTreeSet<&str> = keys.iter().flatten().map(String::as_str).collect();
        let skip = usize::from(drop_first);
        Ok(levels
            .into_iter()
            .skip(skip)
            .map(|level| {
                let values = keys
                    .iter()
                    .map(|k| if k.as_deref() == Some(level) { 1.0 } else { 0.0 })
                    .collect();
                (format!("{name}={level}"), values)
            })
            .collect())
    }
}

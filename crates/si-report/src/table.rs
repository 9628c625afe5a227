//! Rendered table model and its text / LaTeX / JSON writers.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use si_core::{Error, Result};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain text.
    Text,
    /// LaTeX `tabular`.
    Latex,
    /// JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "latex" | "tex" => Ok(OutputFormat::Latex),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Validation(format!("unknown output format: {other}"))),
        }
    }
}

/// A header cell spanning `span` data columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderCell {
    /// Text.
    pub label: String,
    /// Number of data columns covered.
    pub span: usize,
}

/// What a body row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Point estimates with significance markers.
    Coefficient,
    /// Standard errors under the estimate row.
    StdError,
    /// Sub-heading inside the body; cells are empty.
    Group,
    /// Model statistics and extra rows.
    Statistic,
}

/// One labelled body row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Left-hand label (empty for standard-error rows).
    pub label: String,
    /// Row kind.
    pub kind: RowKind,
    /// One cell per data column.
    pub cells: Vec<String>,
}

/// A grid of labelled rows and columns with spanning headers and notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Caption.
    pub title: Option<String>,
    /// Header rows above the column labels; each row's spans sum to the column count.
    pub headers: Vec<Vec<HeaderCell>>,
    /// Data column labels.
    pub columns: Vec<String>,
    /// Body rows.
    pub rows: Vec<Row>,
    /// Index into `rows` where the statistics section starts.
    pub stats_start: usize,
    /// Free-text notes under the table.
    pub notes: Vec<String>,
}

impl Table {
    /// Empty table with the given data column labels.
    pub fn new(columns: Vec<String>) -> Self {
        Self { title: None, headers: Vec::new(), columns, rows: Vec::new(), stats_start: 0, notes: Vec::new() }
    }

    /// Number of data columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Add a header row; spans must sum to the column count.
    pub fn push_header(&mut self, cells: Vec<HeaderCell>) -> Result<()> {
        let total: usize = cells.iter().map(|c| c.span).sum();
        if total != self.n_columns() || cells.iter().any(|c| c.span == 0) {
            return Err(Error::Validation(format!(
                "header spans sum to {}, table has {} columns",
                total,
                self.n_columns()
            )));
        }
        self.headers.push(cells);
        Ok(())
    }

    /// Add a body row; it must have one cell per column.
    pub fn push_row(&mut self, label: impl Into<String>, kind: RowKind, cells: Vec<String>) -> Result<()> {
        let label = label.into();
        if cells.len() != self.n_columns() {
            return Err(Error::Validation(format!(
                "row '{}' has {} cells, table has {} columns",
                label,
                cells.len(),
                self.n_columns()
            )));
        }
        self.rows.push(Row { label, kind, cells });
        Ok(())
    }

    /// Mark the current end of the body as the start of the statistics block.
    pub fn begin_statistics(&mut self) {
        self.stats_start = self.rows.len();
    }

    /// Body row by label.
    pub fn row(&self, label: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Standard-error row directly under the estimate row `label`.
    pub fn std_error_row(&self, label: &str) -> Option<&Row> {
        let i = self.rows.iter().position(|r| r.label == label && r.kind == RowKind::Coefficient)?;
        self.rows.get(i + 1).filter(|r| r.kind == RowKind::StdError)
    }

    /// Render in `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Latex => self.to_latex(),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Aligned plain text.
    pub fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        self.write_text(&mut out)?;
        Ok(out)
    }

    /// LaTeX `table` environment with a `tabular` body.
    pub fn to_latex(&self) -> Result<String> {
        let mut out = String::new();
        self.write_latex(&mut out)?;
        Ok(out)
    }

    fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let label_w = self.rows.iter().map(|r| width(&r.label)).max().unwrap_or(0).max(8);
        let mut col_w: Vec<usize> = self.columns.iter().map(|c| width(c)).collect();
        for r in &self.rows {
            for (w, c) in col_w.iter_mut().zip(&r.cells) {
                *w = (*w).max(width(c));
            }
        }
        // Spanning headers must fit their columns.
        for header in &self.headers {
            let mut j = 0;
            for cell in header {
                if cell.span == 0 || j + cell.span > col_w.len() {
                    break;
                }
                let covered: usize = col_w[j..j + cell.span].iter().sum::<usize>() + 2 * (cell.span - 1);
                let need = width(&cell.label);
                if need > covered {
                    let extra = need - covered;
                    for (t, w) in col_w[j..j + cell.span].iter_mut().enumerate() {
                        *w += extra / cell.span + usize::from(t < extra % cell.span);
                    }
                }
                j += cell.span;
            }
        }
        let total = label_w + col_w.iter().map(|w| w + 2).sum::<usize>();
        let heavy = "=".repeat(total);
        let light = "-".repeat(total);

        if let Some(title) = &self.title {
            writeln!(out, "{title}")?;
        }
        writeln!(out, "{heavy}")?;
        for header in &self.headers {
            let mut line = " ".repeat(label_w);
            let mut j = 0;
            for cell in header {
                let Some(ws) = col_w.get(j..j + cell.span) else { break };
                let w: usize = ws.iter().map(|w| w + 2).sum();
                line.push_str(&center(&cell.label, w));
                j += cell.span;
            }
            writeln!(out, "{}", line.trim_end())?;
        }
        let mut line = " ".repeat(label_w);
        for (c, w) in self.columns.iter().zip(&col_w) {
            line.push_str(&center(c, w + 2));
        }
        writeln!(out, "{}", line.trim_end())?;
        writeln!(out, "{light}")?;
        for (i, r) in self.rows.iter().enumerate() {
            if i == self.stats_start && i > 0 {
                writeln!(out, "{light}")?;
            }
            let mut line = format!("{:<label_w$}", r.label);
            for (c, w) in r.cells.iter().zip(&col_w) {
                line.push_str(&center(c, w + 2));
            }
            writeln!(out, "{}", line.trim_end())?;
        }
        writeln!(out, "{heavy}")?;
        for note in &self.notes {
            writeln!(out, "{note}")?;
        }
        Ok(())
    }

    fn write_latex(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let n = self.n_columns();
        out.write_str("\\begin{table}[!htbp] \\centering\n")?;
        if let Some(title) = &self.title {
            writeln!(out, "  \\caption{{{}}}", escape_latex(title))?;
        }
        writeln!(out, "\\begin{{tabular}}{{@{{\\extracolsep{{5pt}}}}l{}}}", "c".repeat(n))?;
        out.write_str("\\\\[-1.8ex]\\hline\n\\hline \\\\[-1.8ex]\n")?;
        for header in &self.headers {
            let cells: Vec<String> = header
                .iter()
                .map(|c| format!("\\multicolumn{{{}}}{{c}}{{{}}}", c.span, escape_latex(&c.label)))
                .collect();
            writeln!(out, " & {} \\\\", cells.join(" & "))?;
        }
        let labels: Vec<String> = self.columns.iter().map(|c| escape_latex(c)).collect();
        writeln!(out, " & {} \\\\", labels.join(" & "))?;
        out.write_str("\\hline \\\\[-1.8ex]\n")?;
        for (i, r) in self.rows.iter().enumerate() {
            if i == self.stats_start && i > 0 {
                out.write_str("\\hline \\\\[-1.8ex]\n")?;
            }
            let cells: Vec<String> = r.cells.iter().map(|c| latex_cell(c)).collect();
            if r.kind == RowKind::Group {
                writeln!(out, "\\multicolumn{{{}}}{{l}}{{\\textit{{{}}}}} \\\\", n + 1, escape_latex(&r.label))?;
            } else {
                writeln!(out, " {} & {} \\\\", escape_latex(&r.label), cells.join(" & "))?;
            }
        }
        out.write_str("\\hline\n\\hline \\\\[-1.8ex]\n")?;
        for note in &self.notes {
            writeln!(out, "\\multicolumn{{{}}}{{l}}{{\\footnotesize {}}} \\\\", n + 1, escape_latex(note))?;
        }
        out.write_str("\\end{tabular}\n\\end{table}\n")
    }
}

/// Several tables rendered together (e.g. Panel A and Panel B).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report identifier.
    pub id: String,
    /// Panels in display order.
    pub panels: Vec<Table>,
}

impl Report {
    /// Render every panel in `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            _ => {
                let parts = self.panels.iter().map(|p| p.render(format)).collect::<Result<Vec<_>>>()?;
                Ok(parts.join("\n"))
            }
        }
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn center(s: &str, w: usize) -> String {
    let len = width(s);
    if len >= w {
        return s.to_string();
    }
    let left = (w - len) / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(w - len - left))
}

/// Escape LaTeX special characters.
pub fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

// Significance stars go to a superscript so they do not shift the column.
fn latex_cell(s: &str) -> String {
    let stars = s.len() - s.trim_end_matches('*').len();
    if stars == 0 || stars == s.len() {
        return escape_latex(s);
    }
    let (value, marks) = s.split_at(s.len() - stars);
    format!("{}$^{{{}}}$", escape_latex(value), marks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["(1)".into(), "(2)".into()]);
        t.title = Some("Demo".into());
        t.push_header(vec![HeaderCell { label: "Dependent Variable: y".into(), span: 2 }]).unwrap();
        t.push_row("x_1", RowKind::Coefficient, vec!["1.000***".into(), String::new()]).unwrap();
        t.push_row("", RowKind::StdError, vec!["(0.100)".into(), String::new()]).unwrap();
        t.begin_statistics();
        t.push_row("Observations", RowKind::Statistic, vec!["10".into(), "12".into()]).unwrap();
        t
    }

    #[test]
    fn spans_must_cover_columns() {
        let mut t = Table::new(vec!["(1)".into(), "(2)".into(), "(3)".into()]);
        assert!(t.push_header(vec![HeaderCell { label: "a".into(), span: 2 }]).is_err());
        assert!(t.push_header(vec![HeaderCell { label: "a".into(), span: 3 }]).is_ok());
        assert!(t.push_row("r", RowKind::Statistic, vec!["1".into()]).is_err());
    }

    #[test]
    fn text_contains_cells_in_order() {
        let text = sample().to_text().unwrap();
        assert!(text.starts_with("Demo\n"));
        let first = text.find("1.000***").unwrap();
        let se = text.find("(0.100)").unwrap();
        let obs = text.find("Observations").unwrap();
        assert!(first < se && se < obs);
    }

    #[test]
    fn latex_escapes_and_spans() {
        let tex = sample().to_latex().unwrap();
        assert!(tex.contains("\\multicolumn{2}{c}{Dependent Variable: y}"));
        assert!(tex.contains("x\\_1"));
        assert!(tex.contains("1.000$^{***}$"));
    }

    #[test]
    fn json_roundtrip() {
        let t = sample();
        let back: Table = serde_json::from_str(&t.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(back, t);
        assert_eq!(t.std_error_row("x_1").unwrap().cells[0], "(0.100)");
    }

    #[test]
    fn format_names() {
        assert_eq!("LaTeX".parse::<OutputFormat>().unwrap(), OutputFormat::Latex);
        assert!("html".parse::<OutputFormat>().is_err());
    }
}

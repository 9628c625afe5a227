//! schoolinst CLI

mod load;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use si_report::{OutputFormat, ReportId, StudyData, TableStyle};

#[derive(Parser)]
#[command(name = "schoolinst")]
#[command(about = "Schooling, institutions and income: regression tables and figures")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available tables and figures
    List,

    /// Build one table of the catalogue
    Table {
        /// Report id (table1 … table10, table4-liml, …)
        id: String,

        /// Country-level CSV
        #[arg(long)]
        country: PathBuf,

        /// Region-level CSV (needed by table9 and table10)
        #[arg(long)]
        region: Option<PathBuf>,

        /// Output format: text, latex or json
        #[arg(long, default_value = "text")]
        format: String,

        /// YAML file with number formatting (digits, stars, overid_digits)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build figure 1 (three scatter panels with fitted lines)
    Figure {
        /// Country-level CSV
        #[arg(long)]
        country: PathBuf,

        /// Output format: json (artifact) or svg
        #[arg(long, default_value = "json")]
        format: String,

        /// YAML file with SVG styling
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Table { id, country, region, format, config, output } => {
            cmd_table(&id, &country, region.as_deref(), &format, config.as_deref(), output.as_deref())
        }
        Commands::Figure { country, format, config, output } => {
            cmd_figure(&country, &format, config.as_deref(), output.as_deref())
        }
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn read_config(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|p| std::fs::read_to_string(p).with_context(|| format!("failed to read config {}", p.display())))
        .transpose()
}

fn cmd_list() -> Result<()> {
    for id in ReportId::ALL {
        let region = if id.needs_region() { " [needs --region]" } else { "" };
        println!("{:<14} {}{}", id.as_str(), id.description(), region);
    }
    Ok(())
}

fn cmd_table(
    id: &str,
    country: &Path,
    region: Option<&Path>,
    format: &str,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let id: ReportId = id.parse()?;
    if id.is_figure() {
        bail!("{id} is a figure; use `schoolinst figure`");
    }
    if id.needs_region() && region.is_none() {
        bail!("{id} needs the region table (--region)");
    }
    let format: OutputFormat = format.parse()?;
    let style = match read_config(config)? {
        Some(yaml) => TableStyle::from_yaml_str(&yaml).context("invalid table config")?,
        None => TableStyle::default(),
    };

    let country = load::read_frame(country)?;
    let region = region.map(load::read_frame).transpose()?;
    let data = StudyData::new(country, region)?;

    let report = si_report::build_report(id, &data, &style).with_context(|| format!("failed to build {id}"))?;
    tracing::info!(report = %id, panels = report.panels.len(), "built report");
    write_output(output, &report.render(format)?)
}

fn cmd_figure(country: &Path, format: &str, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let viz_config = si_viz_render::config::resolve_config(read_config(config)?.as_deref())?;

    let data = StudyData::new(load::read_frame(country)?, None)?;
    let figure = si_report::figure1(data.country()).context("failed to build figure1")?;
    let json = serde_json::to_string_pretty(&figure)?;

    let text = match format {
        "json" => json,
        "svg" => si_viz_render::render_svg(&json, "figure", &viz_config)?,
        other => bail!("unknown figure format: {other} (expected json or svg)"),
    };
    write_output(output, &text)
}

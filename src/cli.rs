use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::{HOUSING_FIELD, INCOME_FIELD, PersonalInputs, ProjectionConfig, ProjectionEngine};
use crate::render::{Dashboard, build_dashboard};

#[derive(Parser, Debug)]
#[command(
    name = "scenario-forecast",
    about = "Natural vs. China-model scenario forecast for GDP, FDI, income and housing (2024-2029)"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "JSON file replacing the built-in growth rates, base values and horizon"
    )]
    pub scenario_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the interactive dashboard over HTTP
    Serve {
        #[arg(long, env = "FORECAST_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Print the forecast tables to the terminal
    Report {
        #[arg(long, default_value_t = INCOME_FIELD.default, help = "Annual income in TWD")]
        income: f64,
        #[arg(long, default_value_t = HOUSING_FIELD.default, help = "Current home value in TWD")]
        housing: f64,
        #[arg(long, help = "Print the full dashboard document as JSON")]
        json: bool,
        #[arg(long, help = "Write each chart as an SVG file into this directory")]
        svg_dir: Option<PathBuf>,
    },
}

/// `RUST_LOG` selects levels (default `info`); `FORECAST_LOG_FORMAT=json`
/// switches to structured output. Logs go to stderr so report output stays
/// clean.
pub fn init_tracing() {
    let log_format = std::env::var("FORECAST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ProjectionConfig> {
    let Some(path) = path else {
        return Ok(ProjectionConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    let config = serde_json::from_str::<ProjectionConfig>(&raw)
        .with_context(|| format!("invalid scenario file {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded scenario file");
    Ok(config)
}

pub fn load_engine(path: Option<&Path>) -> Result<ProjectionEngine> {
    let config = load_config(path)?;
    let engine = ProjectionEngine::new(config).context("scenario configuration rejected")?;
    Ok(engine)
}

pub fn run_report(
    engine: &ProjectionEngine,
    inputs: PersonalInputs,
    json: bool,
    svg_dir: Option<&Path>,
) -> Result<()> {
    let dashboard = build_dashboard(engine, inputs).context("failed to build forecast")?;

    if let Some(dir) = svg_dir {
        let written = write_charts(&dashboard, dir)?;
        tracing::info!(count = written.len(), dir = %dir.display(), "wrote chart files");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", format_report(&dashboard));
    }
    Ok(())
}

pub fn write_charts(dashboard: &Dashboard, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut written = Vec::with_capacity(dashboard.sections.len());
    for (index, section) in dashboard.sections.iter().enumerate() {
        let path = dir.join(format!("{}-{}.svg", index + 1, section.key));
        fs::write(&path, &section.chart_svg)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

pub fn format_report(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n\n", dashboard.title, dashboard.caption));

    let mut assumptions = Table::new();
    assumptions.load_preset(UTF8_FULL);
    assumptions.set_header(vec![Cell::new("Model assumption"), Cell::new("Rate")]);
    for assumption in &dashboard.assumptions {
        assumptions.add_row(vec![
            Cell::new(assumption.label),
            Cell::new(&assumption.display),
        ]);
    }
    out.push_str(&format!("{assumptions}\n\n"));

    for section in &dashboard.sections {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(section.columns.iter().map(Cell::new));
        for row in &section.rows {
            table.add_row(row.iter().map(Cell::new));
        }
        out.push_str(&format!("{}\n{}\n\n", section.title, table));
    }
    out.push_str(dashboard.note);
    out.push('\n');
    out
}

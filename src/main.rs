use anyhow::Result;
use clap::Parser;

use scenario_forecast::cli::{self, Cli, Command};
use scenario_forecast::core::PersonalInputs;

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_tracing();
    let args = Cli::parse();
    let engine = cli::load_engine(args.scenario_file.as_deref())?;

    match args.command {
        Command::Serve { port } => {
            scenario_forecast::api::run_http_server(engine, port).await?;
        }
        Command::Report {
            income,
            housing,
            json,
            svg_dir,
        } => {
            cli::run_report(
                &engine,
                PersonalInputs { income, housing },
                json,
                svg_dir.as_deref(),
            )?;
        }
    }
    Ok(())
}

//! launchmap binary entry point.

use clap::Parser;
use launchmap::cli::{
    cmd_country, cmd_features, cmd_resolve, cmd_serve, cmd_stats, cmd_status, cmd_validate, Cli,
    CliResult, Commands,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let layout = cli.data.layout();
    let json = cli.json;

    let output = match cli.command {
        Commands::Features => cmd_features(&layout, json)?,
        Commands::Resolve { feature } => cmd_resolve(&layout, &feature, json)?,
        Commands::Status { feature, country } => cmd_status(&layout, &feature, &country, json)?,
        Commands::Stats { feature } => cmd_stats(&layout, &feature, json)?,
        Commands::Country { country, feature } => {
            cmd_country(&layout, &country, feature.as_deref(), json)?
        }
        Commands::Validate { file } => cmd_validate(&layout, &file)?,
        Commands::Serve { bind } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(cmd_serve(&layout, &bind))?;
            return Ok(());
        }
    };

    println!("{output}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

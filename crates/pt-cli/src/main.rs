use std::io::{BufWriter, Write, stdout};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pt_cli::commands::{export, pair, report, status, util};
use pt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let pairing = config.pairing();

    let stdout = stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match command {
        Commands::Pair { input, json } => {
            let dataset = util::load_dataset(input, &config)?;
            pair::run(&mut writer, &dataset, &pairing, *json)?;
        }
        Commands::Status { input, json } => {
            let dataset = util::load_dataset(input, &config)?;
            status::run(&mut writer, &dataset, &pairing, *json)?;
        }
        Commands::Report { input, json } => {
            let dataset = util::load_dataset(input, &config)?;
            report::run(&mut writer, &dataset, &pairing, *json)?;
        }
        Commands::Export {
            input,
            format,
            output,
        } => {
            let dataset = util::load_dataset(input, &config)?;
            export::run(&dataset, &pairing, *format, output)?;
            writeln!(writer, "Exported to {}", output.display())?;
        }
    }

    writer.flush()?;
    Ok(())
}

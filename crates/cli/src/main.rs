use std::process::ExitCode;

use clap::Parser;

use estatebooks_cli::{Cli, run};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.log_config() {
        Some(config) => estatebooks_observability::init_with(&config),
        None => estatebooks_observability::init(),
    }

    let outcome = run(&cli)?;
    tracing::info!(outcome = ?outcome, "done");

    Ok(outcome.exit_code())
}

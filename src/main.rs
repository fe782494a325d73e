use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sfzf_lib::cli::Cli;

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.name();
    sfzf_lib::run(cli).with_context(|| format!("sfzf {command} failed"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    sfzf_lib::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

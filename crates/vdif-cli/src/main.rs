//! `read-vdif`: inspect VDIF headers and correlator spectra.

use std::io::{self, IsTerminal};

use clap::Parser;

mod cli;
mod commands;
mod logging;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    init_logging(&log_config_from_cli(&cli));

    let result = match &cli.command {
        Command::Header(args) => commands::run_header(args),
        Command::Spectra(args) => commands::run_spectra(args),
        Command::Layout => commands::run_layout(),
    };

    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        with_ansi: io::stderr().is_terminal(),
    }
}

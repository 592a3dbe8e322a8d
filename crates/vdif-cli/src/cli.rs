//! Command-line arguments for `read-vdif`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use vdif_spectra::UnitLayout;

#[derive(Parser)]
#[command(
    name = "read-vdif",
    version,
    about = "Inspect VDIF headers and correlator spectra",
    long_about = "Decode VDIF frame headers and assemble correlator spectra from files \
                  made of VDIF header, correlator head and correlator data blocks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode the headers of the first units of a file.
    Header(HeaderArgs),

    /// Assemble the spectra of a file and summarize them.
    Spectra(SpectraArgs),

    /// Print the VDIF header field table as JSON.
    Layout,
}

#[derive(Args)]
pub struct HeaderArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of units to decode.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Args)]
pub struct SpectraArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Unit layout overrides, applied on top of an optional JSON config file.
#[derive(Args)]
pub struct LayoutArgs {
    /// JSON file with unit layout settings.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Words in the correlator head block.
    #[arg(long = "corr-head-words", value_name = "N")]
    pub corr_head_words: Option<usize>,

    /// 16-bit samples in the correlator data block.
    #[arg(long = "corr-data-samples", value_name = "N")]
    pub corr_data_samples: Option<usize>,

    /// Units per scan.
    #[arg(long = "units-per-scan", value_name = "N")]
    pub units_per_scan: Option<usize>,

    /// Always read full 8-word headers, ignoring the legacy flag.
    #[arg(long = "no-legacy-detect")]
    pub no_legacy_detect: bool,
}

impl LayoutArgs {
    /// Applies the flags that were given to `layout`.
    pub fn apply(&self, mut layout: UnitLayout) -> UnitLayout {
        if let Some(words) = self.corr_head_words {
            layout.corr_head_words = words;
        }
        if let Some(samples) = self.corr_data_samples {
            layout.corr_data_samples = samples;
        }
        if let Some(units) = self.units_per_scan {
            layout.units_per_scan = units;
        }
        if self.no_legacy_detect {
            layout.detect_legacy = false;
        }
        layout
    }
}

/// CLI log format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

//! CLI argument definitions for tabex.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "tabex",
    version,
    about = "Render tabular data as CSV, TSV, Excel, HTML, XML or JSON",
    long_about = "Render tabular data into interchange formats.\n\n\
                  Reads CSV input and writes the payload in any registered format,\n\
                  either directly or through a configured export with column\n\
                  selection, scopes, ordering and paging."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

impl Cli {
    /// Logging configuration from the flags. An explicit `--log-level` beats
    /// `-v`/`-q`, and either one disables `RUST_LOG`.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = match self.log_level {
            Some(LogLevelArg::Error) => LevelFilter::ERROR,
            Some(LogLevelArg::Warn) => LevelFilter::WARN,
            Some(LogLevelArg::Info) => LevelFilter::INFO,
            Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
            Some(LogLevelArg::Trace) => LevelFilter::TRACE,
            None => self.verbosity.tracing_level_filter(),
        };
        let format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        let ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig::default()
            .with_level_filter(level_filter)
            .with_env_filter(!(self.verbosity.is_present() || self.log_level.is_some()))
            .with_format(format)
            .with_timestamps(self.log_timestamps)
            .with_target(self.log_target)
            .with_ansi(ansi)
            .with_log_file(self.log_file.clone())
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the registered export formats.
    Formats,

    /// Render a CSV file into another format.
    Render(RenderArgs),

    /// Run a configured export over a CSV-backed table.
    Export(ExportArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output format identifier (see `tabex formats`).
    #[arg(long = "format", short = 'f')]
    pub format: String,

    /// Where the header row comes from.
    #[arg(long = "headers", value_enum, default_value = "first-row")]
    pub headers: HeadersArg,

    /// Explicit header names, one per column (overrides --headers).
    #[arg(long = "header", value_name = "NAME", num_args = 1..)]
    pub header: Vec<String>,

    /// Write the payload to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// CSV file whose first line names the columns. The file stem is the
    /// entity and table name.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output format identifier (see `tabex formats`).
    #[arg(long = "format", short = 'f')]
    pub format: String,

    /// JSON file with the entity's export options.
    #[arg(long = "config", value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Export exactly these columns.
    #[arg(long = "only", value_name = "COLUMN", num_args = 1..)]
    pub only: Vec<String>,

    /// Export the configured columns minus these.
    #[arg(long = "except", value_name = "COLUMN", num_args = 1..)]
    pub except: Vec<String>,

    /// Named scopes to apply, in order (see `scope_definitions` in the
    /// config file).
    #[arg(long = "scope", value_name = "SCOPE")]
    pub scope: Vec<String>,

    /// Ordering, e.g. "last_name ASC, id DESC".
    #[arg(long = "order", value_name = "ORDER")]
    pub order: Option<String>,

    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    #[arg(long = "offset", value_name = "N")]
    pub offset: Option<usize>,

    /// Omit the header row.
    #[arg(long = "no-headers")]
    pub no_headers: bool,

    /// Write the payload to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Header sources for `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeadersArg {
    /// The first CSV line is the header row.
    FirstRow,
    /// No header row.
    None,
    /// Generic `column_<n>` identifiers.
    Derive,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tabex").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn default_log_config() {
        let config = parse(&["--color", "never", "formats"]).log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(!config.with_timestamps);
        assert!(!config.with_target);
        assert!(!config.with_ansi);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn log_flags_reach_the_config() {
        let config = parse(&[
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--log-timestamps",
            "--log-target",
            "--log-file",
            "tabex.log",
            "--color",
            "always",
            "formats",
        ])
        .log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert!(config.with_timestamps);
        assert!(config.with_target);
        assert!(config.with_ansi);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("tabex.log")));
    }

    #[test]
    fn verbosity_flags_disable_rust_log() {
        let config = parse(&["-vv", "formats"]).log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
    }
}

//! CLI argument definitions for the docmatch driver.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "docmatch",
    version,
    about = "Detect the document type of a spreadsheet and validate its rows",
    long_about = "Match the columns of a CSV file against a registry of JSON schema\n\
                  definitions, pick the best fitting document type and validate\n\
                  every row against it."
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

    /// Allow raw cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect the document type of a CSV file and validate its rows.
    Detect(DetectArgs),

    /// List the schemas in the registry.
    Schemas(SchemasArgs),
}

#[derive(Parser)]
pub struct RegistryArgs {
    /// Schema registry directory (default: $DOCMATCH_SCHEMAS_DIR or ./schemas).
    #[arg(long = "schemas", value_name = "DIR")]
    pub schemas: Option<PathBuf>,

    /// Reject schemas with unknown validation types or invalid patterns.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct DetectArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Replay a saved column mapping instead of scoring every schema.
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Save the column mapping of this run for later replay.
    #[arg(long = "write-mapping", value_name = "FILE")]
    pub write_mapping: Option<PathBuf>,

    /// Write the full result as JSON.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Match against this schema only.
    #[arg(long = "schema", value_name = "NAME")]
    pub schema: Option<String>,

    /// Number of invalid rows listed in the summary.
    #[arg(long = "max-errors", value_name = "N", default_value_t = 20)]
    pub max_errors: usize,
}

#[derive(Parser)]
pub struct SchemasArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
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

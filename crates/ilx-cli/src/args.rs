use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the ilx-resolve binary.
#[derive(Parser, Debug)]
#[command(
    name = "ilx-resolve",
    version,
    about = "Resolve proxies, renames and refusals for a loaded program"
)]
pub struct CliArgs {
    /// Program manifest (JSON) describing assemblies, types and members.
    pub manifest: PathBuf,

    /// Resolver options file (JSON, camelCase keys).
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Disable the per-run resolution cache.
    #[arg(long = "noCache", alias = "no-cache")]
    pub no_cache: bool,

    /// Stop "not implemented" messages right after "has not".
    #[arg(long = "shortMessages", alias = "short-messages")]
    pub short_messages: bool,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text, ignore_case = true)]
    pub format: ReportFormat,

    /// Only report the type with this full name.
    #[arg(long = "type")]
    pub only_type: Option<String>,

    /// Enable color and formatting in the text report.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

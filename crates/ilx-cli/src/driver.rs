//! Load inputs, run the resolution pass, pick an exit status.

use anyhow::{Context, Result};
use ilx_common::ResolverOptions;
use ilx_metadata::{ConfigurationError, ResolutionReport, resolve_program};
use ilx_model::Program;
use std::path::Path;
use tracing::info;

use crate::args::CliArgs;

pub const EXIT_SUCCESS: i32 = 0;
/// The pass completed but some members are refused or unimplemented.
pub const EXIT_DIAGNOSTICS_REPORTED: i32 = 1;
/// A proxy declaration or inheritance chain is invalid.
pub const EXIT_CONFIGURATION_ERROR: i32 = 2;

#[derive(Debug)]
pub enum RunResult {
    Resolved(ResolutionReport),
    Misconfigured(ConfigurationError),
}

impl RunResult {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Resolved(report) if report.diagnostics.is_empty() => EXIT_SUCCESS,
            Self::Resolved(_) => EXIT_DIAGNOSTICS_REPORTED,
            Self::Misconfigured(_) => EXIT_CONFIGURATION_ERROR,
        }
    }
}

pub fn load_program(path: &Path) -> Result<Program> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    Program::from_json(&text).with_context(|| format!("failed to load manifest {}", path.display()))
}

/// Options file first, then command-line overrides.
pub fn load_options(args: &CliArgs) -> Result<ResolverOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options {}", path.display()))?;
            ResolverOptions::from_json(&text)
                .with_context(|| format!("failed to parse options {}", path.display()))?
        }
        None => ResolverOptions::default(),
    };
    if args.no_cache {
        options.optimizer.cache_type_expressions = false;
    }
    if args.short_messages {
        options.complete_unimplemented_messages = false;
    }
    Ok(options)
}

pub fn run(args: &CliArgs) -> Result<RunResult> {
    let program = load_program(&args.manifest)?;
    let options = load_options(args)?;
    info!(
        manifest = %args.manifest.display(),
        types = program.types().len(),
        "manifest loaded"
    );

    Ok(match resolve_program(&program, options) {
        Ok(mut report) => {
            if let Some(only) = &args.only_type {
                report.types.retain(|t| t.name.as_str() == only);
            }
            RunResult::Resolved(report)
        }
        Err(err) => RunResult::Misconfigured(err),
    })
}

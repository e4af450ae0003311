use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use ilx_cli::args::{CliArgs, ReportFormat};
use ilx_cli::driver::{self, RunResult};
use ilx_cli::reporter::Reporter;

fn main() -> Result<()> {
    // ILX_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    ilx_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let result = driver::run(&args)?;
    let color = args
        .pretty
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    let reporter = Reporter::new(color);

    match (&result, args.format) {
        (RunResult::Resolved(report), ReportFormat::Json) => {
            let json =
                serde_json::to_string_pretty(report).context("failed to serialize report")?;
            println!("{json}");
        }
        (RunResult::Resolved(report), ReportFormat::Text) => {
            println!("{}", reporter.render_report(report));
        }
        (RunResult::Misconfigured(err), ReportFormat::Json) => {
            let json = serde_json::to_string_pretty(&err.to_diagnostic())
                .context("failed to serialize diagnostic")?;
            println!("{json}");
        }
        (RunResult::Misconfigured(err), ReportFormat::Text) => {
            println!("{}", reporter.render_error(err));
        }
    }

    std::process::exit(result.exit_code());
}

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use markaudit_analysis::{create_reporter, AuditResult, Auditor, CategoryRegistry, PytestOracle};
use markaudit_core::config::{AuditConfig, CliOverrides};
use markaudit_core::errors::{AuditError, ConfigError, ErrorCode, ReportError};
use markaudit_core::tracing::init_tracing;

/// Exit status for fatal errors (bad config, unreadable root).
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "markaudit")]
#[command(about = "Audit pytest test categorization markers", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit the JSON report
    #[arg(long, conflicts_with = "markdown")]
    json: bool,

    /// Emit the Markdown report
    #[arg(long)]
    markdown: bool,

    /// Exit 1 if any issue or uncategorized test exists
    #[arg(long)]
    strict: bool,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Project root to scan
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Test directory relative to the root (repeatable)
    #[arg(long = "test-dir")]
    test_dirs: Vec<String>,

    /// Skip the pytest collection cross-check
    #[arg(long)]
    no_oracle: bool,

    /// Per-query collection timeout in seconds
    #[arg(long)]
    oracle_timeout: Option<u64>,

    /// Parser threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Configuration file (default: <root>/markaudit.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            test_dirs: (!self.test_dirs.is_empty()).then(|| self.test_dirs.clone()),
            threads: self.threads,
            oracle_enabled: self.no_oracle.then_some(false),
            oracle_timeout_secs: self.oracle_timeout,
        }
    }

    fn format(&self) -> &'static str {
        if self.json {
            "json"
        } else if self.markdown {
            "markdown"
        } else {
            "console"
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let directive = match cli.verbose {
        0 => "markaudit=warn",
        1 => "markaudit=info",
        _ => "markaudit=debug",
    };
    init_tracing(directive);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{}", tagged(&err));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let config = AuditConfig::load(&cli.root, cli.config.as_deref(), Some(&cli.overrides()))?;
    let registry = CategoryRegistry::builtin();

    let oracle = PytestOracle::new(&config.oracle, &cli.root);
    let mut auditor = Auditor::new(&registry, &config);
    if config.oracle.effective_enabled() {
        auditor = auditor.with_oracle(&oracle);
    }
    let result = auditor.audit(&cli.root)?;

    let format = cli.format();
    let use_color = cli.output.is_none() && std::io::stdout().is_terminal();
    let reporter = create_reporter(format, registry, &config.report, use_color)
        .ok_or_else(|| ReportError::UnknownFormat {
            format: format.to_string(),
        })?;
    let rendered = reporter.generate(&result)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), format, "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(exit_code(cli.strict, &result))
}

fn exit_code(strict: bool, result: &AuditResult) -> u8 {
    strict_exit(
        strict,
        !result.issues().is_empty(),
        !result.uncategorized_functions().is_empty(),
    )
}

fn strict_exit(strict: bool, has_issues: bool, has_uncategorized: bool) -> u8 {
    u8::from(strict && (has_issues || has_uncategorized))
}

/// `[CODE] message` for known error types, the plain chain otherwise.
fn tagged(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<AuditError>() {
        e.tagged()
    } else if let Some(e) = err.downcast_ref::<ConfigError>() {
        e.tagged()
    } else if let Some(e) = err.downcast_ref::<ReportError>() {
        e.tagged()
    } else {
        format!("error: {err:#}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_mode_controls_exit_code() {
        assert_eq!(strict_exit(false, true, true), 0);
        assert_eq!(strict_exit(true, false, false), 0);
        assert_eq!(strict_exit(true, true, false), 1);
        assert_eq!(strict_exit(true, false, true), 1);
    }

    #[test]
    fn json_and_markdown_conflict() {
        assert!(Cli::try_parse_from(["markaudit", "--json", "--markdown"]).is_err());
        let cli = Cli::try_parse_from(["markaudit", "--markdown", "--no-oracle"]).unwrap();
        assert_eq!(cli.format(), "markdown");
        assert_eq!(cli.overrides().oracle_enabled, Some(false));
        assert!(cli.overrides().test_dirs.is_none());
    }

    #[test]
    fn config_errors_are_tagged() {
        let err = anyhow::Error::from(ConfigError::FileNotFound {
            path: "x.toml".to_string(),
        });
        assert!(tagged(&err).starts_with("[CONFIG_ERROR]"));
    }
}

//! `estatebooks` command line: evaluate voucher drafts stored as JSON.
//!
//! Reads from a file or stdin, writes JSON to stdout; logs go to stderr.

pub mod input;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use estatebooks_accounting::{
    Totals, ValidationReport, VoucherAction, VoucherIssue, VoucherStatus, compute_totals,
    validate_for_submit,
};
use estatebooks_core::DomainError;
use estatebooks_observability::{LogConfig, LogFormat};

pub use input::{DraftInput, LineInput};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid voucher JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "estatebooks", version, about = "Balance and validate accounting vouchers")]
pub struct Cli {
    /// Log output format (defaults to ESTATEBOOKS_LOG_FORMAT, then json)
    #[arg(long = "log-format", global = true)]
    pub log_format: Option<LogFormat>,

    /// Log filter directive (defaults to RUST_LOG, then `info`)
    #[arg(long = "log-filter", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the derived system line and totals of a voucher draft
    Totals {
        /// Voucher draft JSON file (stdin when omitted)
        #[arg(short = 'i', long = "input")]
        input: Option<String>,
    },
    /// Check whether a voucher draft may be submitted
    Validate {
        /// Voucher draft JSON file (stdin when omitted)
        #[arg(short = 'i', long = "input")]
        input: Option<String>,
    },
    /// List workflow actions available from a voucher status
    Actions {
        /// draft, submitted, approved, posted or reversed
        status: String,
    },
}

impl Cli {
    /// Logging overrides given on the command line, layered over the
    /// environment. `None` when no logging flag was passed.
    pub fn log_config(&self) -> Option<LogConfig> {
        if self.log_format.is_none() && self.log_filter.is_none() {
            return None;
        }
        let mut config = LogConfig::from_env();
        if let Some(format) = self.log_format {
            config.format = format;
        }
        config.filter = self.log_filter.clone();
        Some(config)
    }
}

/// How a command ended, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Rejected,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Ok => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(1),
        }
    }
}

/// Result of `validate`, tagged by `outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutput {
    Ok {
        totals: Totals,
    },
    Rejected {
        issues: Vec<IssueOutput>,
        totals: Totals,
    },
}

/// An issue plus its display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueOutput {
    pub message: String,
    #[serde(flatten)]
    pub issue: VoucherIssue,
}

impl From<ValidationReport> for ValidationOutput {
    fn from(report: ValidationReport) -> Self {
        ValidationOutput::Rejected {
            issues: report
                .issues
                .into_iter()
                .map(|issue| IssueOutput {
                    message: issue.to_string(),
                    issue,
                })
                .collect(),
            totals: report.totals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionsOutput {
    pub status: VoucherStatus,
    pub actions: Vec<VoucherAction>,
    pub editable: bool,
}

/// Run a parsed command against stdin/stdout.
pub fn run(cli: &Cli) -> Result<Outcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = match &cli.command {
        Command::Totals { input } | Command::Validate { input } => {
            let reader = open_input(input.as_deref())?;
            execute(&cli.command, reader, &mut out)?
        }
        Command::Actions { .. } => execute(&cli.command, io::empty(), &mut out)?,
    };
    out.flush()?;
    Ok(outcome)
}

/// Run a command with explicit reader and writer.
pub fn execute(command: &Command, reader: impl Read, mut out: impl Write) -> Result<Outcome> {
    match command {
        Command::Totals { .. } => {
            let draft = DraftInput::from_reader(reader)?;
            let (voucher_type, primary, lines) = draft.resolve()?;
            let totals = compute_totals(voucher_type, &primary, &lines);
            write_json(&mut out, &totals)?;
            Ok(Outcome::Ok)
        }
        Command::Validate { .. } => {
            let draft = DraftInput::from_reader(reader)?;
            let (voucher_type, primary, lines) = draft.resolve()?;
            let (output, outcome) = match validate_for_submit(voucher_type, &primary, &lines) {
                Ok(totals) => (ValidationOutput::Ok { totals }, Outcome::Ok),
                Err(report) => {
                    tracing::warn!(issues = report.issues.len(), "voucher rejected");
                    (ValidationOutput::from(report), Outcome::Rejected)
                }
            };
            write_json(&mut out, &output)?;
            Ok(outcome)
        }
        Command::Actions { status } => {
            let status: VoucherStatus = status.parse()?;
            let output = ActionsOutput {
                status,
                actions: status.available_actions(),
                editable: status.is_editable(),
            };
            write_json(&mut out, &output)?;
            Ok(Outcome::Ok)
        }
    }
}

fn open_input(path: Option<&str>) -> Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => {
            tracing::debug!(path, "reading voucher draft");
            Box::new(BufReader::new(File::open(path)?))
        }
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

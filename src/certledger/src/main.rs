#![allow(special_module_name)]
use crate::lib::diagnosis::{diagnose, Diagnosis};
use crate::lib::environment::{Environment, EnvironmentImpl};
use crate::lib::error::{CertError, CertResult};
use crate::lib::logger::{create_root_logger, LoggingMode};
use clap::{ArgAction, Parser};
use std::backtrace::BacktraceStatus;
use std::io::Write;
use std::path::PathBuf;

mod commands;
mod lib;
mod util;

/// Enrolls Fabric identities and issues or queries academic certificates on the ledger.
#[derive(Parser)]
#[command(name = "certledger", version, arg_required_else_help = true)]
pub struct CliOpts {
    /// Displays detailed information about operations. -vv will generate a very large number of messages.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppresses informational messages. -qq limits to errors only; -qqqq disables them all.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    quiet: u8,

    /// The logging mode to use. You can log to stderr, a file, or both.
    #[arg(long = "log", default_value = "stderr", value_parser = ["stderr", "tee", "file"], global = true)]
    logmode: String,

    /// The file to log to, if logging to a file (see --log).
    #[arg(long, global = true)]
    logfile: Option<String>,

    /// JSON file with participant settings, layered over the built-in participants.
    #[arg(long, env = "CERTLEDGER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::CertLedgerCommand,
}

/// Setup a logger with the proper configuration, based on arguments.
fn setup_logging(opts: &CliOpts) -> slog::Logger {
    let verbose_level = opts.verbose as i64 - opts.quiet as i64;

    let mode = match opts.logmode.as_str() {
        "tee" => LoggingMode::Tee(PathBuf::from(opts.logfile.as_deref().unwrap_or("log.txt"))),
        "file" => LoggingMode::File(PathBuf::from(opts.logfile.as_deref().unwrap_or("log.txt"))),
        _ => LoggingMode::Stderr,
    };

    create_root_logger(verbose_level, mode)
}

fn print_error_and_diagnosis(err: CertError, error_diagnosis: Diagnosis) -> term::Result<()> {
    let mut stderr = util::stderr_wrapper::stderr_wrapper();

    // print error chain stack
    for (level, cause) in err.chain().enumerate() {
        let (color, prefix) = if level == 0 {
            (term::color::RED, "Error")
        } else {
            (term::color::YELLOW, "Caused by")
        };
        stderr.fg(color)?;
        write!(stderr, "{prefix}: ")?;
        stderr.reset()?;
        writeln!(stderr, "{cause}")?;
    }

    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        writeln!(stderr, "Backtrace:\n{backtrace}")?;
    }

    // print diagnosis
    if let Some(error_explanation) = error_diagnosis.0 {
        stderr.fg(term::color::YELLOW)?;
        writeln!(stderr, "Error explanation:")?;
        stderr.reset()?;
        writeln!(stderr, "{}", error_explanation)?;
    }
    if let Some(action_suggestion) = error_diagnosis.1 {
        stderr.fg(term::color::YELLOW)?;
        writeln!(stderr, "How to resolve the error:")?;
        stderr.reset()?;
        writeln!(stderr, "{}", action_suggestion)?;
    }
    Ok(())
}

fn inner_main(cli_opts: CliOpts) -> CertResult {
    let log = setup_logging(&cli_opts);
    let env = EnvironmentImpl::new(cli_opts.config.as_deref())?.with_logger(log);

    slog::trace!(
        env.get_logger(),
        "Trace mode enabled. Lots of logs coming up."
    );
    commands::exec(&env, cli_opts.command)
}

fn main() {
    let cli_opts = CliOpts::parse();
    let failure_exit_code = cli_opts.command.failure_exit_code();
    if let Err(err) = inner_main(cli_opts) {
        let error_diagnosis = diagnose(&err);
        // Nothing is left to report to if stderr itself fails.
        let _ = print_error_and_diagnosis(err, error_diagnosis);
        std::process::exit(failure_exit_code);
    }
}

#[cfg(test)]
mod tests {
    use crate::CliOpts;
    use clap::{CommandFactory, Parser};

    #[test]
    fn validate_cli() {
        CliOpts::command().debug_assert();
    }

    #[test]
    fn every_command_runs_without_arguments() {
        for command in ["enroll-admin", "enroll-user", "issue-certs", "query-certs"] {
            assert!(
                CliOpts::try_parse_from(["certledger", command]).is_ok(),
                "{command} should parse without arguments"
            );
        }
        assert!(CliOpts::try_parse_from(["certledger", "wallet", "list"]).is_ok());
        assert!(CliOpts::try_parse_from(["certledger", "wallet", "remove", "shane"]).is_err());
        assert!(CliOpts::try_parse_from([
            "certledger",
            "wallet",
            "remove",
            "shane",
            "--participant",
            "user",
        ])
        .is_ok());
    }

    #[test]
    fn enrollment_and_transactions_fail_with_distinct_codes() {
        let enroll = CliOpts::try_parse_from(["certledger", "enroll-user"]).unwrap();
        assert_eq!(enroll.command.failure_exit_code(), 1);
        let query = CliOpts::try_parse_from(["certledger", "-v", "query-certs"]).unwrap();
        assert_eq!(query.command.failure_exit_code(), 255);
        assert_eq!(query.verbose, 1);
    }
}

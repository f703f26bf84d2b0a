use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use anyhow::Context;
use certledger_core::config::participant::{ADMIN_PARTICIPANT, USER_PARTICIPANT};
use clap::Subcommand;
use tokio::runtime::Runtime;

mod enroll;
mod issue_certs;
mod participant;
mod query_certs;
mod wallet;

/// Exit code for a failed enrollment.
const ENROLLMENT_FAILURE: i32 = 1;
/// Exit code for a failed ledger transaction.
const TRANSACTION_FAILURE: i32 = 255;

#[derive(Subcommand)]
pub enum CertLedgerCommand {
    /// Enrolls the issuing participant (Org2, identity "isabella" by default).
    EnrollAdmin(enroll::EnrollOpts),
    /// Enrolls the querying participant (Org1, identity "shane" by default).
    EnrollUser(enroll::EnrollOpts),
    IssueCerts(issue_certs::IssueCertsOpts),
    QueryCerts(query_certs::QueryCertsOpts),
    Wallet(wallet::WalletOpts),
}

impl CertLedgerCommand {
    /// The process exit code when this command fails.
    pub fn failure_exit_code(&self) -> i32 {
        match self {
            CertLedgerCommand::EnrollAdmin(_) | CertLedgerCommand::EnrollUser(_) => {
                ENROLLMENT_FAILURE
            }
            _ => TRANSACTION_FAILURE,
        }
    }
}

pub fn exec(env: &dyn Environment, cmd: CertLedgerCommand) -> CertResult {
    match cmd {
        CertLedgerCommand::EnrollAdmin(v) => enroll::exec(env, v, ADMIN_PARTICIPANT),
        CertLedgerCommand::EnrollUser(v) => enroll::exec(env, v, USER_PARTICIPANT),
        CertLedgerCommand::IssueCerts(v) => issue_certs::exec(env, v),
        CertLedgerCommand::QueryCerts(v) => query_certs::exec(env, v),
        CertLedgerCommand::Wallet(v) => wallet::exec(env, v),
    }
}

/// All network work runs on a single-threaded runtime.
pub(crate) fn new_runtime() -> CertResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Unable to create a runtime.")
}

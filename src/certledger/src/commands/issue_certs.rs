use crate::commands::new_runtime;
use crate::commands::participant::ParticipantOpts;
use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use crate::lib::operations::transactions::{issue_certificates, GatewayTarget, Issuance};
use certledger_core::config::participant::ADMIN_PARTICIPANT;
use certledger_core::gateway::FabricGateway;
use clap::Parser;
use slog::info;

/// Submits certificate issuance to the ledger. Without arguments this seeds the ledger
/// with `InitLedger`; with `--cert-id` it issues one academic certificate.
#[derive(Parser)]
pub struct IssueCertsOpts {
    #[command(flatten)]
    participant: ParticipantOpts,

    /// Id of the academic certificate to issue.
    #[arg(long, requires_all = ["student_id", "student_name"])]
    cert_id: Option<String>,

    #[arg(long, requires = "cert_id")]
    student_id: Option<String>,

    #[arg(long, requires = "cert_id")]
    student_name: Option<String>,

    /// One transcript entry; repeat for each course.
    #[arg(long, requires = "cert_id")]
    transcript: Vec<String>,
}

impl IssueCertsOpts {
    fn issuance(&self) -> Issuance {
        match (&self.cert_id, &self.student_id, &self.student_name) {
            (Some(cert_id), Some(student_id), Some(student_name)) => {
                Issuance::AcademicCertificate {
                    cert_id: cert_id.clone(),
                    student_id: student_id.clone(),
                    student_name: student_name.clone(),
                    transcript: self.transcript.clone(),
                }
            }
            _ => Issuance::InitLedger,
        }
    }
}

pub fn exec(env: &dyn Environment, opts: IssueCertsOpts) -> CertResult {
    let log = env.get_logger();
    let issuance = opts.issuance();
    let participant = opts.participant.resolve(env, ADMIN_PARTICIPANT)?;
    let working_dir = env.get_working_dir();

    let runtime = new_runtime()?;
    let mut stdout = std::io::stdout();
    runtime.block_on(issue_certificates(
        log,
        FabricGateway::new(log),
        || GatewayTarget::load(participant, working_dir),
        &issuance,
        &mut stdout,
    ))?;
    info!(log, "Issue program complete.");
    Ok(())
}

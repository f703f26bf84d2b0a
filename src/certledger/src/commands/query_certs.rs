use crate::commands::new_runtime;
use crate::commands::participant::ParticipantOpts;
use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use crate::lib::operations::transactions::{
    certificate_queries, query_certificates, GatewayTarget, DEFAULT_ACADEMIC_CERT_ID,
    DEFAULT_CURRICULAR_CERT_ID, DEFAULT_STUDENT_ID,
};
use certledger_core::config::participant::USER_PARTICIPANT;
use certledger_core::gateway::FabricGateway;
use clap::Parser;
use slog::info;

/// Looks certificates up by id and by student, printing each result as JSON.
#[derive(Parser)]
pub struct QueryCertsOpts {
    #[command(flatten)]
    participant: ParticipantOpts,

    /// Academic certificate to read.
    #[arg(long, default_value = DEFAULT_ACADEMIC_CERT_ID)]
    aca_cert_id: String,

    /// Extracurricular certificate to read.
    #[arg(long, default_value = DEFAULT_CURRICULAR_CERT_ID)]
    curr_cert_id: String,

    /// Student whose certificates are listed.
    #[arg(long, default_value = DEFAULT_STUDENT_ID)]
    student_id: String,
}

pub fn exec(env: &dyn Environment, opts: QueryCertsOpts) -> CertResult {
    let log = env.get_logger();
    let queries = certificate_queries(&opts.aca_cert_id, &opts.curr_cert_id, &opts.student_id);
    let participant = opts.participant.resolve(env, USER_PARTICIPANT)?;
    let working_dir = env.get_working_dir();

    let runtime = new_runtime()?;
    let mut stdout = std::io::stdout();
    runtime.block_on(query_certificates(
        log,
        FabricGateway::new(log),
        || GatewayTarget::load(participant, working_dir),
        &queries,
        &mut stdout,
    ))?;
    info!(log, "Queryapp program complete.");
    Ok(())
}

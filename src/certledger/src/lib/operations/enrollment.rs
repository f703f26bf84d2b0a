use crate::lib::error::CertResult;
use certledger_core::ca::{AttributeRequest, CaClient, EnrollmentRequest};
use certledger_core::config::connection_profile::ConnectionProfile;
use certledger_core::config::participant::ParticipantConfig;
use certledger_core::enrollment::{enroll_identity, EnrollOutcome};
use certledger_core::wallet::FileSystemWallet;
use fn_error_context::context;
use slog::{info, Logger};
use std::path::Path;

/// Enrolls the participant with its organization's CA into its file system wallet.
/// `ca_profile` and `attributes` are passed through to the CA's enroll request.
#[context("Failed to enroll '{}' into the wallet.", participant.identity_label)]
pub async fn enroll_participant(
    log: &Logger,
    participant: &ParticipantConfig,
    working_dir: &Path,
    ca_profile: Option<&str>,
    attributes: &[AttributeRequest],
) -> CertResult<EnrollOutcome> {
    let profile = ConnectionProfile::load(&participant.connection_profile)?;
    let ca_info = profile.certificate_authority(&participant.ca_name)?;
    let ca = CaClient::new(log, &ca_info)?;

    let wallet_path = participant.wallet_dir(working_dir);
    let wallet = FileSystemWallet::new(&wallet_path)?;
    info!(log, "Wallet path: {}", wallet_path.display());

    let request = EnrollmentRequest {
        profile: ca_profile.map(str::to_string),
        attr_reqs: attributes.to_vec(),
        ..EnrollmentRequest::new(&participant.enrollment_id, &participant.enrollment_secret)
    };
    let outcome = enroll_identity(
        log,
        &ca,
        &wallet,
        &participant.identity_label,
        &participant.msp_id,
        &request,
    )
    .await?;
    Ok(outcome)
}

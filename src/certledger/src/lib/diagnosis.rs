use crate::lib::error::CertError;
use certledger_core::error::ca::EnrollError;
use certledger_core::error::connection_profile::ConnectionProfileError;
use certledger_core::error::gateway::GatewayError;
use certledger_core::error::reqwest::WrappedReqwestError;
use thiserror::Error as ThisError;

/// Contains two Option<Strings> that can be displayed to the user:
///   - Error explanation: Goes into a bit of detail on what the error is and/or where the user can find out more about it.
///   - Action suggestion: Tells the user how to move forward to resolve the error.
pub type Diagnosis = (Option<String>, Option<String>);
pub const NULL_DIAGNOSIS: Diagnosis = (None, None);

#[derive(ThisError, Debug)]
// This message will appear in the context trace of the stack. The diagnosis should not be displayed there yet.
#[error("Diagnosis was added here.")]
/// Attach with `.context(DiagnosedError::new(..))` to skip the generic diagnosis and
/// print this explanation and suggestion instead.
pub struct DiagnosedError {
    /// A user-friendly explanation of what went wrong.
    pub error_explanation: Option<String>,

    /// Suggestions for the user on how to move forward to recover from the error.
    pub action_suggestion: Option<String>,
}

impl DiagnosedError {
    pub fn new(error_explanation: String, action_suggestion: String) -> Self {
        Self {
            error_explanation: Some(error_explanation),
            action_suggestion: Some(action_suggestion),
        }
    }
}

/// Attempts to give helpful suggestions on how to resolve errors.
pub fn diagnose(err: &CertError) -> Diagnosis {
    // Context values are only visible to a downcast on the anyhow error, not on chain links.
    if let Some(diagnosed_error) = err.downcast_ref::<DiagnosedError>() {
        return (
            diagnosed_error.error_explanation.clone(),
            diagnosed_error.action_suggestion.clone(),
        );
    }

    for cause in err.chain() {
        if let Some(EnrollError::Rejected { status: 401, .. }) = cause.downcast_ref::<EnrollError>()
        {
            return diagnose_rejected_credentials();
        }
        if let Some(reqwest_err) = cause.downcast_ref::<WrappedReqwestError>() {
            if reqwest_err.is_unreachable() {
                return diagnose_unreachable_ca();
            }
        }
        match cause.downcast_ref::<GatewayError>() {
            Some(GatewayError::IdentityNotFound(label)) => return diagnose_missing_identity(label),
            Some(GatewayError::ConnectFailed { url, .. }) => return diagnose_unreachable_peer(url),
            _ => {}
        }
        if let Some(ConnectionProfileError::LoadFailed(_)) =
            cause.downcast_ref::<ConnectionProfileError>()
        {
            return diagnose_unreadable_profile();
        }
    }
    NULL_DIAGNOSIS
}

fn diagnose_rejected_credentials() -> Diagnosis {
    (
        Some("The certificate authority did not accept the enrollment ID and secret.".to_string()),
        Some("Check the enrollment ID and secret (--enrollment-id, --enrollment-secret) and that the user is registered with this certificate authority.".to_string()),
    )
}

fn diagnose_unreachable_ca() -> Diagnosis {
    (
        Some("The certificate authority could not be reached.".to_string()),
        Some("Make sure the Fabric network is running and that the CA url in the connection profile is reachable from this machine.".to_string()),
    )
}

fn diagnose_missing_identity(label: &str) -> Diagnosis {
    (
        Some(format!("The wallet holds no identity labelled '{label}'.")),
        Some("Enroll the identity first with 'certledger enroll-admin' or 'certledger enroll-user', or point --wallet at the wallet that holds it.".to_string()),
    )
}

fn diagnose_unreachable_peer(url: &str) -> Diagnosis {
    (
        Some(format!("The gateway peer at {url} could not be reached.")),
        Some("Make sure the Fabric network is running. Peers running in local containers need the localhost rewrite, which is on by default; pass --no-localhost only for remote peers.".to_string()),
    )
}

fn diagnose_unreadable_profile() -> Diagnosis {
    (
        Some("The connection profile could not be read.".to_string()),
        Some("Pass the path of the organization's connection profile with --connection-profile.".to_string()),
    )
}

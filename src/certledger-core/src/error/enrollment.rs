use crate::error::ca::EnrollError;
use crate::error::wallet::WalletError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrollIdentityError {
    #[error("Failed to check wallet for identity '{0}'")]
    CheckWalletFailed(String, #[source] WalletError),

    #[error("Failed to enroll '{0}' with the certificate authority")]
    EnrollFailed(String, #[source] EnrollError),

    #[error("Failed to import identity '{0}' into the wallet")]
    ImportFailed(String, #[source] WalletError),
}

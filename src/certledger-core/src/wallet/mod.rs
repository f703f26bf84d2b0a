//! Wallets: label-keyed stores of X.509 identities.
use crate::error::wallet::WalletError;
use crate::identity::X509Identity;

mod filesystem;
mod in_memory;

pub use filesystem::FileSystemWallet;
pub use in_memory::InMemoryWallet;

pub trait Wallet: Send + Sync {
    fn get(&self, label: &str) -> Result<Option<X509Identity>, WalletError>;

    /// Stores an identity, replacing any existing record under the same label.
    fn put(&self, label: &str, identity: &X509Identity) -> Result<(), WalletError>;

    /// Returns whether a record was removed.
    fn remove(&self, label: &str) -> Result<bool, WalletError>;

    /// Labels in ascending order.
    fn list(&self) -> Result<Vec<String>, WalletError>;

    fn exists(&self, label: &str) -> Result<bool, WalletError> {
        Ok(self.get(label)?.is_some())
    }
}

pub(crate) fn validate_label(label: &str) -> Result<(), WalletError> {
    let bad = label.is_empty()
        || label == "."
        || label == ".."
        || label.contains(['/', '\\', '\0']);
    if bad {
        Err(WalletError::InvalidLabel(label.to_string()))
    } else {
        Ok(())
    }
}

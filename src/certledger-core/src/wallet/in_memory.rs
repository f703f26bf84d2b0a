use super::{validate_label, Wallet};
use crate::error::wallet::WalletError;
use crate::identity::X509Identity;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A wallet that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryWallet {
    identities: Mutex<BTreeMap<String, X509Identity>>,
}

impl InMemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }

    fn identities(&self) -> MutexGuard<'_, BTreeMap<String, X509Identity>> {
        // A poisoned map is still consistent: every operation is a single insert/remove.
        self.identities
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Wallet for InMemoryWallet {
    fn get(&self, label: &str) -> Result<Option<X509Identity>, WalletError> {
        validate_label(label)?;
        Ok(self.identities().get(label).cloned())
    }

    fn put(&self, label: &str, identity: &X509Identity) -> Result<(), WalletError> {
        validate_label(label)?;
        self.identities().insert(label.to_string(), identity.clone());
        Ok(())
    }

    fn remove(&self, label: &str) -> Result<bool, WalletError> {
        validate_label(label)?;
        Ok(self.identities().remove(label).is_some())
    }

    fn list(&self) -> Result<Vec<String>, WalletError> {
        Ok(self.identities().keys().cloned().collect())
    }
}

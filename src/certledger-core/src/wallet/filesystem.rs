use super::{validate_label, Wallet};
use crate::error::wallet::WalletError;
use crate::error::wallet::WalletError::{
    EnsureWalletDirFailed, ListFailed, LoadIdentityFailed, RemoveIdentityFailed,
    SaveIdentityFailed,
};
use crate::identity::X509Identity;
use crate::json::{load_json_file, save_json_file};
use std::path::{Path, PathBuf};

const IDENTITY_FILE_EXTENSION: &str = "id";

/// A directory holding one `<label>.id` JSON file per identity.
///
/// Writes are not coordinated across processes: two concurrent `put`s of the same label
/// race and the last writer wins.
#[derive(Clone, Debug)]
pub struct FileSystemWallet {
    root: PathBuf,
}

impl FileSystemWallet {
    /// Opens the wallet, creating its directory if needed.
    pub fn new(root: &Path) -> Result<Self, WalletError> {
        crate::fs::ensure_dir_exists(root).map_err(EnsureWalletDirFailed)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn identity_path(&self, label: &str) -> PathBuf {
        self.root.join(format!("{label}.{IDENTITY_FILE_EXTENSION}"))
    }
}

impl Wallet for FileSystemWallet {
    fn get(&self, label: &str) -> Result<Option<X509Identity>, WalletError> {
        validate_label(label)?;
        let path = self.identity_path(label);
        if !path.is_file() {
            return Ok(None);
        }
        load_json_file(&path)
            .map(Some)
            .map_err(|e| LoadIdentityFailed(label.to_string(), e))
    }

    fn put(&self, label: &str, identity: &X509Identity) -> Result<(), WalletError> {
        validate_label(label)?;
        save_json_file(&self.identity_path(label), identity)
            .map_err(|e| SaveIdentityFailed(label.to_string(), e))
    }

    fn remove(&self, label: &str) -> Result<bool, WalletError> {
        validate_label(label)?;
        let path = self.identity_path(label);
        if !path.exists() {
            return Ok(false);
        }
        crate::fs::remove_file(&path).map_err(|e| RemoveIdentityFailed(label.to_string(), e))?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<String>, WalletError> {
        let mut labels: Vec<String> = crate::fs::read_dir(&self.root)
            .map_err(ListFailed)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str())
                        == Some(IDENTITY_FILE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        labels.sort();
        Ok(labels)
    }
}

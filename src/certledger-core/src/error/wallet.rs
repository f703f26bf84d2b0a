use crate::error::fs::{EnsureDirExistsError, ReadDirError, RemoveFileError};
use crate::error::structured_file::StructuredFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid wallet label '{0}': labels must be non-empty and must not contain path separators")]
    InvalidLabel(String),

    #[error("Failed to create wallet directory")]
    EnsureWalletDirFailed(#[source] EnsureDirExistsError),

    #[error("Failed to list wallet contents")]
    ListFailed(#[source] ReadDirError),

    #[error("Failed to load identity '{0}' from wallet")]
    LoadIdentityFailed(String, #[source] StructuredFileError),

    #[error("Failed to store identity '{0}' in wallet")]
    SaveIdentityFailed(String, #[source] StructuredFileError),

    #[error("Failed to remove identity '{0}' from wallet")]
    RemoveIdentityFailed(String, #[source] RemoveFileError),
}

/// The type to represent certledger results.
pub type CertResult<T = ()> = anyhow::Result<T>;

/// The type to represent certledger errors.
pub type CertError = anyhow::Error;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity type '{0}' is not supported (expected X.509)")]
    UnsupportedIdentityType(String),

    #[error("Certificate is not valid PEM")]
    CertificateNotPem(#[source] pem::PemError),

    #[error("Expected a PEM 'CERTIFICATE' block, found '{0}'")]
    NotACertificate(String),

    #[error("Private key is neither PKCS#8 nor SEC1 PEM")]
    InvalidPrivateKey(#[source] p256::pkcs8::Error),
}

#[derive(Error, Debug)]
pub enum GenerateKeyError {
    #[error("Failed to encode private key as PKCS#8")]
    EncodePrivateKeyFailed(#[source] p256::pkcs8::Error),

    #[error("Invalid certificate request subject '{0}'")]
    InvalidSubject(String, #[source] x509_cert::der::Error),

    #[error("Failed to build certificate signing request")]
    BuildCsrFailed(#[source] x509_cert::builder::Error),

    #[error("Failed to encode certificate signing request")]
    EncodeCsrFailed(#[source] x509_cert::der::Error),
}

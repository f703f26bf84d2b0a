use crate::error::identity::{GenerateKeyError, IdentityError};
use crate::error::reqwest::WrappedReqwestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaClientError {
    #[error("Invalid certificate authority url '{0}'")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error("Failed to parse TLS root certificates for the certificate authority")]
    InvalidTlsRoots(#[source] WrappedReqwestError),

    #[error("Failed to build HTTP client for the certificate authority")]
    BuildHttpClientFailed(#[source] WrappedReqwestError),
}

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("Failed to generate key and certificate request")]
    GenerateKeyFailed(#[source] GenerateKeyError),

    #[error("Failed to reach certificate authority at {url}")]
    RequestFailed {
        url: String,
        #[source]
        source: WrappedReqwestError,
    },

    #[error("Certificate authority rejected enrollment of '{enrollment_id}' (HTTP {status}): {messages}")]
    Rejected {
        enrollment_id: String,
        status: u16,
        messages: String,
    },

    #[error("Failed to decode certificate authority response")]
    MalformedResponse(#[source] WrappedReqwestError),

    #[error("Certificate authority response carries no certificate")]
    MissingCertificate,

    #[error("Certificate returned by the certificate authority is not valid base64")]
    CertificateNotBase64(#[source] base64::DecodeError),

    #[error("Certificate returned by the certificate authority is invalid")]
    InvalidCertificate(#[source] IdentityError),
}

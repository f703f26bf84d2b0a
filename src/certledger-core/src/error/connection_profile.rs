use crate::error::fs::ReadToStringError;
use crate::error::structured_file::StructuredFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionProfileError {
    #[error("Failed to load connection profile")]
    LoadFailed(#[source] StructuredFileError),

    #[error("Certificate authority '{0}' is not defined in the connection profile")]
    CertificateAuthorityNotFound(String),

    #[error("Certificate authority '{0}' has no TLS root certificates (caTLSCACerts.pem or tlsCACerts.pem)")]
    MissingCaTlsRoots(String),

    #[error("Connection profile defines no peers")]
    NoPeers,

    #[error("Peer '{0}' is not defined in the connection profile")]
    PeerNotFound(String),

    #[error("Peer '{peer}' has an invalid url '{url}'")]
    InvalidPeerUrl {
        peer: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Peer '{peer}' uses unsupported url scheme '{scheme}' (expected grpc or grpcs)")]
    UnsupportedPeerScheme { peer: String, scheme: String },

    #[error("Failed to read TLS certificates for '{0}'")]
    ReadTlsCertsFailed(String, #[source] ReadToStringError),
}

use crate::error::connection_profile::ConnectionProfileError;
use crate::error::identity::IdentityError;
use crate::error::wallet::WalletError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway is not connected")]
    NotConnected,

    #[error("Identity '{0}' was not found in the wallet")]
    IdentityNotFound(String),

    #[error("Failed to load identity '{0}' from the wallet")]
    LoadIdentityFailed(String, #[source] WalletError),

    #[error("Identity '{0}' cannot be used for signing")]
    InvalidIdentity(String, #[source] IdentityError),

    #[error("Failed to determine the gateway peer")]
    ResolvePeerFailed(#[source] ConnectionProfileError),

    #[error("Invalid gateway endpoint '{url}'")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("Failed to connect to gateway peer at {url}")]
    ConnectFailed {
        url: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("{stage} of transaction '{transaction}' failed")]
    RpcFailed {
        stage: &'static str,
        transaction: String,
        #[source]
        source: tonic::Status,
    },

    #[error("Transaction '{transaction}' returned status {status}: {message}")]
    TransactionFailed {
        transaction: String,
        status: i32,
        message: String,
    },

    #[error("Gateway response is missing the {0}")]
    MissingResponse(&'static str),

    #[error("Failed to decode {0}")]
    DecodeFailed(&'static str, #[source] prost::DecodeError),

    #[error("Transaction {transaction_id} failed to commit with status {code}")]
    CommitFailed { transaction_id: String, code: String },
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Transaction returned an empty payload")]
    Empty,

    #[error("Transaction payload is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
}

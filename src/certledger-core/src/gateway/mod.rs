//! Access to a Fabric network through a gateway peer.
//!
//! [`Gateway`] is the seam between the transaction flows and the network: the flows
//! only ever see a connected gateway, a [`Network`] (channel) and a [`Contract`]
//! (chaincode, optionally namespaced) on which transactions are submitted or
//! evaluated.
use crate::config::connection_profile::ConnectionProfile;
use crate::error::gateway::GatewayError;
use crate::wallet::Wallet;

mod client;
mod payload;
mod proposal;
pub mod protos;
mod session;

pub use client::FabricGateway;
pub use payload::decode_json_payload;
pub use session::GatewaySession;

pub struct ConnectOptions<'a> {
    /// Label of the wallet identity to transact as.
    pub identity: &'a str,
    pub wallet: &'a dyn Wallet,
    /// Rewrite peer hosts to `localhost`, for networks running in local containers.
    pub as_localhost: bool,
}

/// A single transaction invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub channel: String,
    pub chaincode: String,
    /// Fully qualified transaction name, including any contract namespace.
    pub function: String,
    pub args: Vec<String>,
}

impl TransactionRequest {
    /// Chaincode input: the function name followed by the arguments.
    pub fn chaincode_args(&self) -> Vec<Vec<u8>> {
        std::iter::once(self.function.as_bytes().to_vec())
            .chain(self.args.iter().map(|arg| arg.as_bytes().to_vec()))
            .collect()
    }
}

#[allow(async_fn_in_trait)]
pub trait Gateway {
    async fn connect(
        &mut self,
        profile: &ConnectionProfile,
        options: &ConnectOptions<'_>,
    ) -> Result<(), GatewayError>;

    /// Runs a read-only query against one peer; nothing is ordered.
    async fn evaluate(&self, request: &TransactionRequest) -> Result<Vec<u8>, GatewayError>;

    /// Endorses, orders and waits for the commit of a transaction.
    async fn submit(&self, request: &TransactionRequest) -> Result<Vec<u8>, GatewayError>;

    /// Releases the connection. Safe to call when not connected.
    fn disconnect(&mut self);

    fn network(&self, channel: &str) -> Network<'_, Self>
    where
        Self: Sized,
    {
        Network {
            gateway: self,
            channel: channel.to_string(),
        }
    }
}

pub struct Network<'g, G: Gateway> {
    gateway: &'g G,
    channel: String,
}

impl<'g, G: Gateway> Network<'g, G> {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn contract_with_namespace(
        &self,
        chaincode: &str,
        namespace: Option<&str>,
    ) -> Contract<'g, G> {
        Contract {
            gateway: self.gateway,
            channel: self.channel.clone(),
            chaincode: chaincode.to_string(),
            namespace: namespace.map(str::to_string),
        }
    }
}

pub struct Contract<'g, G: Gateway> {
    gateway: &'g G,
    channel: String,
    chaincode: String,
    namespace: Option<String>,
}

impl<'g, G: Gateway> Contract<'g, G> {
    pub fn chaincode(&self) -> &str {
        &self.chaincode
    }

    pub fn create_request(&self, name: &str, args: &[&str]) -> TransactionRequest {
        let function = match &self.namespace {
            Some(namespace) => format!("{namespace}:{name}"),
            None => name.to_string(),
        };
        TransactionRequest {
            channel: self.channel.clone(),
            chaincode: self.chaincode.clone(),
            function,
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub async fn evaluate_transaction(
        &self,
        name: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, GatewayError> {
        self.gateway.evaluate(&self.create_request(name, args)).await
    }

    pub async fn submit_transaction(
        &self,
        name: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, GatewayError> {
        self.gateway.submit(&self.create_request(name, args)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl Gateway for Offline {
        async fn connect(
            &mut self,
            _profile: &ConnectionProfile,
            _options: &ConnectOptions<'_>,
        ) -> Result<(), GatewayError> {
            Err(GatewayError::NotConnected)
        }

        async fn evaluate(&self, _request: &TransactionRequest) -> Result<Vec<u8>, GatewayError> {
            Err(GatewayError::NotConnected)
        }

        async fn submit(&self, _request: &TransactionRequest) -> Result<Vec<u8>, GatewayError> {
            Err(GatewayError::NotConnected)
        }

        fn disconnect(&mut self) {}
    }

    #[test]
    fn contract_builds_requests() {
        let gateway = Offline;
        let contract = gateway
            .network("test")
            .contract_with_namespace("cert", None);
        let request = contract.create_request("ReadAcaCert", &["aCert1"]);
        assert_eq!(
            request,
            TransactionRequest {
                channel: "test".to_string(),
                chaincode: "cert".to_string(),
                function: "ReadAcaCert".to_string(),
                args: vec!["aCert1".to_string()],
            }
        );
        assert_eq!(
            request.chaincode_args(),
            vec![b"ReadAcaCert".to_vec(), b"aCert1".to_vec()]
        );
    }

    #[test]
    fn namespace_qualifies_function_name() {
        let gateway = Offline;
        let contract = gateway
            .network("test")
            .contract_with_namespace("papercontract", Some("org.papernet.commercialpaper"));
        let request = contract.create_request("QueryAcaCertByStudentID", &["SWE1904873"]);
        assert_eq!(
            request.function,
            "org.papernet.commercialpaper:QueryAcaCertByStudentID"
        );
        assert_eq!(request.chaincode, "papercontract");
    }
}

use super::proposal::{endorsed_response, prepare_proposal, signed_commit_status_request};
use super::protos::gateway::{
    CommitStatusResponse, EndorseRequest, EndorseResponse, EvaluateRequest, EvaluateResponse,
    SubmitRequest, SubmitResponse,
};
use super::protos::common::Envelope;
use super::protos::peer::{Response, TxValidationCode};
use super::{ConnectOptions, Gateway, TransactionRequest};
use crate::config::connection_profile::ConnectionProfile;
use crate::error::gateway::GatewayError;
use crate::error::gateway::GatewayError::{
    CommitFailed, ConnectFailed, IdentityNotFound, InvalidEndpoint, InvalidIdentity,
    LoadIdentityFailed, MissingResponse, NotConnected, ResolvePeerFailed, RpcFailed,
    TransactionFailed,
};
use crate::identity::SigningIdentity;
use slog::{debug, info, Logger};
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};

const EVALUATE_PATH: &str = "/gateway.Gateway/Evaluate";
const ENDORSE_PATH: &str = "/gateway.Gateway/Endorse";
const SUBMIT_PATH: &str = "/gateway.Gateway/Submit";
const COMMIT_STATUS_PATH: &str = "/gateway.Gateway/CommitStatus";

/// Chaincode responses at or above this status are errors.
const ERROR_STATUS_THRESHOLD: i32 = 400;

struct Connection {
    grpc: Grpc<Channel>,
    signer: SigningIdentity,
}

/// A [`Gateway`] backed by the Fabric Gateway gRPC service of a single peer.
pub struct FabricGateway {
    logger: Logger,
    connection: Option<Connection>,
}

impl FabricGateway {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.clone(),
            connection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&self) -> Result<&Connection, GatewayError> {
        self.connection.as_ref().ok_or(NotConnected)
    }

    async fn unary<Req, Resp>(
        connection: &Connection,
        path: &'static str,
        request: Req,
    ) -> Result<Resp, tonic::Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = connection.grpc.clone();
        grpc.ready()
            .await
            .map_err(|e| tonic::Status::unavailable(format!("Service was not ready: {e}")))?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(path),
                codec,
            )
            .await?;
        Ok(response.into_inner())
    }
}

fn rpc_failed(
    stage: &'static str,
    request: &TransactionRequest,
) -> impl FnOnce(tonic::Status) -> GatewayError {
    let transaction = request.function.clone();
    move |source| RpcFailed {
        stage,
        transaction,
        source,
    }
}

fn check_response(
    request: &TransactionRequest,
    response: Response,
) -> Result<Vec<u8>, GatewayError> {
    if response.status >= ERROR_STATUS_THRESHOLD {
        return Err(TransactionFailed {
            transaction: request.function.clone(),
            status: response.status,
            message: response.message,
        });
    }
    Ok(response.payload)
}

impl Gateway for FabricGateway {
    async fn connect(
        &mut self,
        profile: &ConnectionProfile,
        options: &ConnectOptions<'_>,
    ) -> Result<(), GatewayError> {
        let label = options.identity;
        let identity = options
            .wallet
            .get(label)
            .map_err(|e| LoadIdentityFailed(label.to_string(), e))?
            .ok_or_else(|| IdentityNotFound(label.to_string()))?;
        let signer = SigningIdentity::from_x509(&identity)
            .map_err(|e| InvalidIdentity(label.to_string(), e))?;

        let peer = profile
            .gateway_peer(options.as_localhost)
            .map_err(ResolvePeerFailed)?;
        let invalid_endpoint = |source| InvalidEndpoint {
            url: peer.url.clone(),
            source,
        };
        let mut endpoint = Endpoint::from_shared(peer.url.clone()).map_err(invalid_endpoint)?;
        if peer.is_tls() {
            let mut tls = ClientTlsConfig::new();
            if let Some(roots) = &peer.tls_roots {
                tls = tls.ca_certificate(Certificate::from_pem(roots));
            }
            if let Some(server_name) = &peer.server_name_override {
                tls = tls.domain_name(server_name.clone());
            }
            endpoint = endpoint.tls_config(tls).map_err(invalid_endpoint)?;
        }

        debug!(self.logger, "Connecting to gateway peer"; "peer" => &peer.name, "url" => &peer.url);
        let channel = endpoint.connect().await.map_err(|source| ConnectFailed {
            url: peer.url.clone(),
            source,
        })?;
        info!(self.logger, "Connected to gateway peer {}", peer.name; "msp_id" => signer.msp_id());

        self.connection = Some(Connection {
            grpc: Grpc::new(channel),
            signer,
        });
        Ok(())
    }

    async fn evaluate(&self, request: &TransactionRequest) -> Result<Vec<u8>, GatewayError> {
        let connection = self.connection()?;
        let proposal = prepare_proposal(&connection.signer, request);
        debug!(self.logger, "Evaluating transaction"; "transaction" => &request.function, "tx_id" => &proposal.transaction_id);

        let response: EvaluateResponse = Self::unary(
            connection,
            EVALUATE_PATH,
            EvaluateRequest {
                transaction_id: proposal.transaction_id,
                channel_id: request.channel.clone(),
                proposed_transaction: Some(proposal.signed),
                target_organizations: vec![],
            },
        )
        .await
        .map_err(rpc_failed("Evaluation", request))?;

        let result = response.result.ok_or(MissingResponse("evaluation result"))?;
        check_response(request, result)
    }

    async fn submit(&self, request: &TransactionRequest) -> Result<Vec<u8>, GatewayError> {
        let connection = self.connection()?;
        let signer = &connection.signer;
        let proposal = prepare_proposal(signer, request);
        let transaction_id = proposal.transaction_id;
        debug!(self.logger, "Submitting transaction"; "transaction" => &request.function, "tx_id" => &transaction_id);

        let endorsed: EndorseResponse = Self::unary(
            connection,
            ENDORSE_PATH,
            EndorseRequest {
                transaction_id: transaction_id.clone(),
                channel_id: request.channel.clone(),
                proposed_transaction: Some(proposal.signed),
                endorsing_organizations: vec![],
            },
        )
        .await
        .map_err(rpc_failed("Endorsement", request))?;
        let prepared = endorsed
            .prepared_transaction
            .ok_or(MissingResponse("prepared transaction"))?;
        let result = check_response(request, endorsed_response(&prepared.payload)?)?;

        let signature = signer.sign(&prepared.payload);
        let _: SubmitResponse = Self::unary(
            connection,
            SUBMIT_PATH,
            SubmitRequest {
                transaction_id: transaction_id.clone(),
                channel_id: request.channel.clone(),
                prepared_transaction: Some(Envelope {
                    payload: prepared.payload,
                    signature,
                }),
            },
        )
        .await
        .map_err(rpc_failed("Submission", request))?;

        let status: CommitStatusResponse = Self::unary(
            connection,
            COMMIT_STATUS_PATH,
            signed_commit_status_request(signer, &transaction_id, &request.channel),
        )
        .await
        .map_err(rpc_failed("Commit status check", request))?;

        match TxValidationCode::try_from(status.result) {
            Ok(TxValidationCode::Valid) => {}
            Ok(code) => {
                return Err(CommitFailed {
                    transaction_id,
                    code: format!("{code:?}"),
                })
            }
            Err(_) => {
                return Err(CommitFailed {
                    transaction_id,
                    code: status.result.to_string(),
                })
            }
        }
        debug!(self.logger, "Transaction committed"; "tx_id" => &transaction_id, "block" => status.block_number);
        Ok(result)
    }

    fn disconnect(&mut self) {
        self.connection = None;
    }
}

use super::protos::common::{ChannelHeader, Header, HeaderType, Payload, SignatureHeader};
use super::protos::gateway::CommitStatusRequest;
use super::protos::gateway::SignedCommitStatusRequest;
use super::protos::peer::{
    chaincode_spec, ChaincodeAction, ChaincodeActionPayload, ChaincodeHeaderExtension,
    ChaincodeId, ChaincodeInput, ChaincodeInvocationSpec, ChaincodeProposalPayload,
    ChaincodeSpec, Proposal, ProposalResponsePayload, SignedProposal, Transaction,
};
use super::TransactionRequest;
use crate::error::gateway::GatewayError;
use crate::identity::SigningIdentity;
use prost::Message;
use sha2::{Digest, Sha256};
use std::time::SystemTime;

const NONCE_LENGTH: usize = 24;

/// A signed proposal together with the id the network will know it by.
pub(crate) struct PreparedProposal {
    pub transaction_id: String,
    pub signed: SignedProposal,
}

/// Transaction ids are the hex SHA-256 of the nonce followed by the creator bytes.
pub(crate) fn transaction_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

pub(crate) fn prepare_proposal(
    signer: &SigningIdentity,
    request: &TransactionRequest,
) -> PreparedProposal {
    let nonce: [u8; NONCE_LENGTH] = rand::random();
    prepare_proposal_with_nonce(signer, request, &nonce, SystemTime::now())
}

fn prepare_proposal_with_nonce(
    signer: &SigningIdentity,
    request: &TransactionRequest,
    nonce: &[u8],
    now: SystemTime,
) -> PreparedProposal {
    let creator = signer.creator();
    let transaction_id = transaction_id(nonce, &creator);
    let chaincode_id = ChaincodeId {
        name: request.chaincode.clone(),
        ..Default::default()
    };

    let channel_header = ChannelHeader {
        r#type: HeaderType::EndorserTransaction as i32,
        timestamp: Some(prost_types::Timestamp::from(now)),
        channel_id: request.channel.clone(),
        tx_id: transaction_id.clone(),
        extension: ChaincodeHeaderExtension {
            chaincode_id: Some(chaincode_id.clone()),
        }
        .encode_to_vec(),
        ..Default::default()
    };
    let signature_header = SignatureHeader {
        creator,
        nonce: nonce.to_vec(),
    };
    let header = Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    };

    let invocation = ChaincodeInvocationSpec {
        chaincode_spec: Some(ChaincodeSpec {
            r#type: chaincode_spec::Type::Undefined as i32,
            chaincode_id: Some(chaincode_id),
            input: Some(ChaincodeInput {
                args: request.chaincode_args(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    };
    let payload = ChaincodeProposalPayload {
        input: invocation.encode_to_vec(),
        ..Default::default()
    };

    let proposal_bytes = Proposal {
        header: header.encode_to_vec(),
        payload: payload.encode_to_vec(),
        ..Default::default()
    }
    .encode_to_vec();
    let signature = signer.sign(&proposal_bytes);

    PreparedProposal {
        transaction_id,
        signed: SignedProposal {
            proposal_bytes,
            signature,
        },
    }
}

pub(crate) fn signed_commit_status_request(
    signer: &SigningIdentity,
    transaction_id: &str,
    channel: &str,
) -> SignedCommitStatusRequest {
    let request = CommitStatusRequest {
        transaction_id: transaction_id.to_string(),
        channel_id: channel.to_string(),
        identity: signer.creator(),
    }
    .encode_to_vec();
    let signature = signer.sign(&request);
    SignedCommitStatusRequest { request, signature }
}

/// Digs the chaincode response out of an endorsed transaction envelope payload.
pub(crate) fn endorsed_response(
    envelope_payload: &[u8],
) -> Result<super::protos::peer::Response, GatewayError> {
    let payload = Payload::decode(envelope_payload).map_err(decode("payload"))?;
    let transaction = Transaction::decode(payload.data.as_slice()).map_err(decode("transaction"))?;
    let action = transaction
        .actions
        .first()
        .ok_or(GatewayError::MissingResponse("transaction action"))?;
    let action_payload = ChaincodeActionPayload::decode(action.payload.as_slice())
        .map_err(decode("chaincode action payload"))?;
    let endorsed = action_payload
        .action
        .ok_or(GatewayError::MissingResponse("endorsed action"))?;
    let response_payload =
        ProposalResponsePayload::decode(endorsed.proposal_response_payload.as_slice())
            .map_err(decode("proposal response payload"))?;
    let chaincode_action = ChaincodeAction::decode(response_payload.extension.as_slice())
        .map_err(decode("chaincode action"))?;
    chaincode_action
        .response
        .ok_or(GatewayError::MissingResponse("chaincode response"))
}

fn decode(what: &'static str) -> impl FnOnce(prost::DecodeError) -> GatewayError {
    move |e| GatewayError::DecodeFailed(what, e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::protos::msp::SerializedIdentity;
    use crate::gateway::protos::peer::{ChaincodeEndorsedAction, Response, TransactionAction};
    use crate::identity::tests::TEST_CERTIFICATE;
    use crate::identity::{generate_key_and_csr, X509Identity};
    use p256::ecdsa::signature::Verifier;
    use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
    use p256::pkcs8::DecodePrivateKey;
    use std::time::Duration;

    fn test_signer() -> (SigningIdentity, VerifyingKey) {
        let generated = generate_key_and_csr("user1").unwrap();
        let key = SigningKey::from_pkcs8_pem(&generated.private_key_pem).unwrap();
        let identity = X509Identity::new(
            TEST_CERTIFICATE.to_string(),
            generated.private_key_pem,
            "Org1MSP",
        );
        (
            SigningIdentity::from_x509(&identity).unwrap(),
            VerifyingKey::from(&key),
        )
    }

    fn request() -> TransactionRequest {
        TransactionRequest {
            channel: "test".to_string(),
            chaincode: "cert".to_string(),
            function: "ReadAcaCert".to_string(),
            args: vec!["aCert1".to_string()],
        }
    }

    /// Wraps a chaincode response the way an endorsing peer does.
    fn endorsed_envelope_payload(response: Response) -> Vec<u8> {
        let chaincode_action = ChaincodeAction {
            response: Some(response),
            ..Default::default()
        };
        let response_payload = ProposalResponsePayload {
            extension: chaincode_action.encode_to_vec(),
            ..Default::default()
        };
        let action_payload = ChaincodeActionPayload {
            action: Some(ChaincodeEndorsedAction {
                proposal_response_payload: response_payload.encode_to_vec(),
            }),
            ..Default::default()
        };
        let transaction = Transaction {
            actions: vec![TransactionAction {
                payload: action_payload.encode_to_vec(),
                ..Default::default()
            }],
        };
        Payload {
            header: None,
            data: transaction.encode_to_vec(),
        }
        .encode_to_vec()
    }

    #[test]
    fn transaction_id_hashes_nonce_then_creator() {
        let expected = hex::encode(Sha256::digest(b"noncecreator"));
        assert_eq!(transaction_id(b"nonce", b"creator"), expected);
        assert_ne!(transaction_id(b"creator", b"nonce"), expected);
    }

    #[test]
    fn proposal_carries_header_and_invocation() {
        let (signer, verifying_key) = test_signer();
        let nonce = [7u8; NONCE_LENGTH];
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        let prepared = prepare_proposal_with_nonce(&signer, &request(), &nonce, now);

        let signature = Signature::from_der(&prepared.signed.signature).unwrap();
        verifying_key
            .verify(&prepared.signed.proposal_bytes, &signature)
            .unwrap();

        let proposal = Proposal::decode(prepared.signed.proposal_bytes.as_slice()).unwrap();
        let header = Header::decode(proposal.header.as_slice()).unwrap();
        let channel_header = ChannelHeader::decode(header.channel_header.as_slice()).unwrap();
        let signature_header =
            SignatureHeader::decode(header.signature_header.as_slice()).unwrap();

        assert_eq!(channel_header.r#type, HeaderType::EndorserTransaction as i32);
        assert_eq!(channel_header.channel_id, "test");
        assert_eq!(channel_header.tx_id, prepared.transaction_id);
        assert_eq!(channel_header.timestamp.unwrap().seconds, 1_700_000_000);
        let extension =
            ChaincodeHeaderExtension::decode(channel_header.extension.as_slice()).unwrap();
        assert_eq!(extension.chaincode_id.unwrap().name, "cert");

        assert_eq!(signature_header.nonce, nonce);
        let creator = SerializedIdentity::decode(signature_header.creator.as_slice()).unwrap();
        assert_eq!(creator.mspid, "Org1MSP");
        assert_eq!(
            prepared.transaction_id,
            transaction_id(&nonce, &signature_header.creator)
        );

        let payload = ChaincodeProposalPayload::decode(proposal.payload.as_slice()).unwrap();
        let invocation = ChaincodeInvocationSpec::decode(payload.input.as_slice()).unwrap();
        let spec = invocation.chaincode_spec.unwrap();
        assert_eq!(spec.chaincode_id.unwrap().name, "cert");
        assert_eq!(
            spec.input.unwrap().args,
            vec![b"ReadAcaCert".to_vec(), b"aCert1".to_vec()]
        );
    }

    #[test]
    fn fresh_proposals_get_distinct_ids() {
        let (signer, _) = test_signer();
        let first = prepare_proposal(&signer, &request());
        let second = prepare_proposal(&signer, &request());
        assert_ne!(first.transaction_id, second.transaction_id);
        assert_eq!(first.transaction_id.len(), 64);
    }

    #[test]
    fn commit_status_request_is_signed() {
        let (signer, verifying_key) = test_signer();
        let signed = signed_commit_status_request(&signer, "abc", "test");
        let request = CommitStatusRequest::decode(signed.request.as_slice()).unwrap();
        assert_eq!(request.transaction_id, "abc");
        assert_eq!(request.channel_id, "test");
        assert_eq!(request.identity, signer.creator());
        let signature = Signature::from_der(&signed.signature).unwrap();
        verifying_key.verify(&signed.request, &signature).unwrap();
    }

    #[test]
    fn extracts_chaincode_response_from_endorsed_payload() {
        let payload = endorsed_envelope_payload(Response {
            status: 200,
            message: String::new(),
            payload: br#"{"aCertID":"aCert3"}"#.to_vec(),
        });
        let response = endorsed_response(&payload).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.payload, br#"{"aCertID":"aCert3"}"#);
    }

    #[test]
    fn transaction_without_actions_is_rejected() {
        let payload = Payload {
            header: None,
            data: Transaction { actions: vec![] }.encode_to_vec(),
        }
        .encode_to_vec();
        assert!(matches!(
            endorsed_response(&payload),
            Err(GatewayError::MissingResponse("transaction action"))
        ));
    }
}

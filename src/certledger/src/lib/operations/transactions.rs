//! The ledger flows: connect as a wallet identity, pick the certificate contract and
//! submit or evaluate transactions against it.
//!
//! Each flow owns its gateway through a [`GatewaySession`], so the gateway is
//! disconnected on every return path, including a failed connect.
use crate::lib::diagnosis::DiagnosedError;
use crate::lib::error::CertResult;
use anyhow::Context;
use certledger_core::config::connection_profile::ConnectionProfile;
use certledger_core::config::participant::ParticipantConfig;
use certledger_core::error::gateway::PayloadError;
use certledger_core::gateway::{
    decode_json_payload, ConnectOptions, Contract, Gateway, GatewaySession,
};
use certledger_core::wallet::{FileSystemWallet, Wallet};
use slog::{info, Logger};
use std::io::Write;
use std::path::Path;

pub const DEFAULT_ACADEMIC_CERT_ID: &str = "aCert1";
pub const DEFAULT_CURRICULAR_CERT_ID: &str = "cCert2";
pub const DEFAULT_STUDENT_ID: &str = "SWE1904873";

/// Who transacts, and against which network.
pub struct GatewayTarget {
    pub participant: ParticipantConfig,
    pub profile: ConnectionProfile,
    pub wallet: Box<dyn Wallet>,
}

impl GatewayTarget {
    /// Reads the participant's connection profile and opens its filesystem wallet.
    pub fn load(participant: ParticipantConfig, working_dir: &Path) -> CertResult<Self> {
        let profile = ConnectionProfile::load(&participant.connection_profile).with_context(|| {
            format!(
                "Failed to load connection profile {}.",
                participant.connection_profile.display()
            )
        })?;
        let wallet = FileSystemWallet::new(&participant.wallet_dir(working_dir))?;
        Ok(Self {
            participant,
            profile,
            wallet: Box::new(wallet),
        })
    }
}

pub enum Issuance {
    /// Seeds the ledger with the chaincode's sample certificates.
    InitLedger,
    AcademicCertificate {
        cert_id: String,
        student_id: String,
        student_name: String,
        transcript: Vec<String>,
    },
}

impl Issuance {
    fn transaction(&self) -> CertResult<(&'static str, Vec<String>)> {
        match self {
            Issuance::InitLedger => Ok(("InitLedger", vec![])),
            Issuance::AcademicCertificate {
                cert_id,
                student_id,
                student_name,
                transcript,
            } => {
                let transcript = serde_json::to_string(transcript)
                    .context("Failed to encode the transcript.")?;
                Ok((
                    "IssueAcaCert",
                    vec![
                        cert_id.clone(),
                        student_id.clone(),
                        student_name.clone(),
                        transcript,
                    ],
                ))
            }
        }
    }
}

/// One read-only certificate lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertQuery {
    pub title: String,
    pub transaction: &'static str,
    pub argument: String,
}

/// The lookups `query-certs` runs, in order.
pub fn certificate_queries(
    academic_cert_id: &str,
    curricular_cert_id: &str,
    student_id: &str,
) -> Vec<CertQuery> {
    vec![
        CertQuery {
            title: "Query Academic Cert by ACertID".to_string(),
            transaction: "ReadAcaCert",
            argument: academic_cert_id.to_string(),
        },
        CertQuery {
            title: format!("Query Academic Cert of {student_id} by rich queries"),
            transaction: "QueryAcaCertByStudentID",
            argument: student_id.to_string(),
        },
        CertQuery {
            title: "Query Extracurricular Cert by CCertID".to_string(),
            transaction: "ReadCurrCert",
            argument: curricular_cert_id.to_string(),
        },
        CertQuery {
            title: format!("Query Extracurricular Cert of {student_id} by rich queries"),
            transaction: "QueryCurrCertByStudentID",
            argument: student_id.to_string(),
        },
    ]
}

async fn connect<G: Gateway>(
    log: &Logger,
    session: &mut GatewaySession<G>,
    target: &GatewayTarget,
) -> CertResult {
    info!(log, "Connect to Fabric gateway.");
    let options = ConnectOptions {
        identity: &target.participant.identity_label,
        wallet: target.wallet.as_ref(),
        as_localhost: target.participant.as_localhost,
    };
    session
        .connect(&target.profile, &options)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to the Fabric gateway as '{}'.",
                target.participant.identity_label
            )
        })
}

fn use_contract<'s, G: Gateway>(
    log: &Logger,
    session: &'s GatewaySession<G>,
    participant: &ParticipantConfig,
) -> Contract<'s, G> {
    let network = session.network(&participant.channel);
    info!(log, "Use network channel: {}.", network.channel());
    let contract = network.contract_with_namespace(
        &participant.chaincode,
        participant.contract_namespace.as_deref(),
    );
    info!(log, "Use smart contract {}.", contract.chaincode());
    contract
}

fn write_json(out: &mut dyn Write, payload: &[u8]) -> CertResult {
    let value = decode_json_payload(payload)?;
    let pretty = serde_json::to_string_pretty(&value)?;
    writeln!(out, "{pretty}")?;
    Ok(())
}

/// Submits `issuance`. `load_target` runs once the gateway session exists, so a
/// failed load still ends with the disconnect step.
pub async fn issue_certificates<G, F>(
    log: &Logger,
    gateway: G,
    load_target: F,
    issuance: &Issuance,
    out: &mut dyn Write,
) -> CertResult
where
    G: Gateway,
    F: FnOnce() -> CertResult<GatewayTarget>,
{
    let mut session = GatewaySession::new(log, gateway);
    let target = load_target()?;
    connect(log, &mut session, &target).await?;
    let contract = use_contract(log, &session, &target.participant);

    let (name, args) = issuance.transaction()?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    info!(log, "Submit {} transaction.", name);
    let response = contract
        .submit_transaction(name, &args)
        .await
        .with_context(|| format!("Failed to submit transaction '{name}'."))?;

    info!(log, "Process {} transaction response.", name);
    if !response.is_empty() {
        write_json(out, &response)
            .with_context(|| format!("Failed to decode the result of '{name}'."))?;
    }
    info!(log, "Transaction complete.");
    Ok(())
}

pub async fn query_certificates<G, F>(
    log: &Logger,
    gateway: G,
    load_target: F,
    queries: &[CertQuery],
    out: &mut dyn Write,
) -> CertResult
where
    G: Gateway,
    F: FnOnce() -> CertResult<GatewayTarget>,
{
    let mut session = GatewaySession::new(log, gateway);
    let target = load_target()?;
    connect(log, &mut session, &target).await?;
    let contract = use_contract(log, &session, &target.participant);

    for (index, query) in queries.iter().enumerate() {
        let name = query.transaction;
        info!(log, "{}. {} ....", index + 1, query.title);
        let response = contract
            .evaluate_transaction(name, &[query.argument.as_str()])
            .await
            .with_context(|| format!("Failed to evaluate transaction '{name}'."))?;

        let written = write_json(out, &response);
        if let Err(e) = written {
            let e = if matches!(e.downcast_ref::<PayloadError>(), Some(PayloadError::Empty)) {
                e.context(DiagnosedError::new(
                    format!("'{name}' found nothing for '{}'.", query.argument),
                    "Check the id, or seed the ledger first with 'certledger issue-certs'."
                        .to_string(),
                ))
            } else {
                e
            };
            return Err(e.context(format!("Failed to decode the result of '{name}'.")));
        }
        info!(log, "{} complete.", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::diagnosis::diagnose;
    use certledger_core::error::gateway::GatewayError;
    use certledger_core::gateway::TransactionRequest;
    use certledger_core::wallet::InMemoryWallet;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        connects: usize,
        disconnects: usize,
        evaluated: Vec<TransactionRequest>,
        submitted: Vec<TransactionRequest>,
    }

    struct ScriptedGateway {
        calls: Rc<RefCell<Calls>>,
        reachable: bool,
        responses: BTreeMap<String, Vec<u8>>,
    }

    impl ScriptedGateway {
        fn new(calls: &Rc<RefCell<Calls>>) -> Self {
            Self {
                calls: calls.clone(),
                reachable: true,
                responses: BTreeMap::new(),
            }
        }

        fn respond(mut self, function: &str, payload: &str) -> Self {
            self.responses
                .insert(function.to_string(), payload.as_bytes().to_vec());
            self
        }

        fn response(&self, request: &TransactionRequest) -> Vec<u8> {
            self.responses
                .get(&request.function)
                .cloned()
                .unwrap_or_default()
        }
    }

    impl Gateway for ScriptedGateway {
        async fn connect(
            &mut self,
            _profile: &ConnectionProfile,
            options: &ConnectOptions<'_>,
        ) -> Result<(), GatewayError> {
            self.calls.borrow_mut().connects += 1;
            if self.reachable {
                Ok(())
            } else {
                Err(GatewayError::IdentityNotFound(options.identity.to_string()))
            }
        }

        async fn evaluate(&self, request: &TransactionRequest) -> Result<Vec<u8>, GatewayError> {
            self.calls.borrow_mut().evaluated.push(request.clone());
            Ok(self.response(request))
        }

        async fn submit(&self, request: &TransactionRequest) -> Result<Vec<u8>, GatewayError> {
            self.calls.borrow_mut().submitted.push(request.clone());
            Ok(self.response(request))
        }

        fn disconnect(&mut self) {
            self.calls.borrow_mut().disconnects += 1;
        }
    }

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    fn offline_target(participant: ParticipantConfig) -> GatewayTarget {
        GatewayTarget {
            participant,
            profile: ConnectionProfile::default(),
            wallet: Box::new(InMemoryWallet::new()),
        }
    }

    const ACADEMIC_CERT: &str = r#"{"docType":"aCert","aCertID":"aCert1","studentID":"SWE1904873","studentName":"Shane","transcript":["SE101:A","SE102:B+"]}"#;

    #[tokio::test]
    async fn failed_connect_still_disconnects() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut gateway = ScriptedGateway::new(&calls);
        gateway.reachable = false;
        let participant = ParticipantConfig::admin();

        let mut out = Vec::new();
        let err = issue_certificates(
            &logger(),
            gateway,
            || Ok(offline_target(participant)),
            &Issuance::InitLedger,
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to connect to the Fabric gateway as 'isabella'."
        );
        assert!(diagnose(&err).1.unwrap().contains("enroll-admin"));
        let calls = calls.borrow();
        assert_eq!(calls.connects, 1);
        assert_eq!(calls.disconnects, 1);
        assert!(calls.submitted.is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn queries_run_in_order_and_print_json() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let gateway = ScriptedGateway::new(&calls)
            .respond("ReadAcaCert", ACADEMIC_CERT)
            .respond("QueryAcaCertByStudentID", &format!("[{ACADEMIC_CERT}]"))
            .respond("ReadCurrCert", r#"{"cCertID":"cCert2","studentID":"SWE1904873"}"#)
            .respond("QueryCurrCertByStudentID", "[]");
        let participant = ParticipantConfig::user();
        let queries = certificate_queries(
            DEFAULT_ACADEMIC_CERT_ID,
            DEFAULT_CURRICULAR_CERT_ID,
            DEFAULT_STUDENT_ID,
        );

        let mut out = Vec::new();
        query_certificates(
            &logger(),
            gateway,
            || Ok(offline_target(participant)),
            &queries,
            &mut out,
        )
        .await
        .unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.disconnects, 1);
        let invoked: Vec<(&str, &str)> = calls
            .evaluated
            .iter()
            .map(|r| (r.function.as_str(), r.args[0].as_str()))
            .collect();
        assert_eq!(
            invoked,
            vec![
                ("ReadAcaCert", "aCert1"),
                ("QueryAcaCertByStudentID", "SWE1904873"),
                ("ReadCurrCert", "cCert2"),
                ("QueryCurrCertByStudentID", "SWE1904873"),
            ]
        );
        assert!(calls
            .evaluated
            .iter()
            .all(|r| r.channel == "test" && r.chaincode == "cert"));

        let printed = String::from_utf8(out).unwrap();
        for field in [
            r#""aCertID": "aCert1""#,
            r#""studentID": "SWE1904873""#,
            r#""studentName": "Shane""#,
            r#""SE102:B+""#,
            r#""cCertID": "cCert2""#,
        ] {
            assert!(printed.contains(field), "missing {field} in {printed}");
        }
    }

    #[tokio::test]
    async fn empty_query_result_is_an_error() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let gateway = ScriptedGateway::new(&calls);
        let participant = ParticipantConfig::user();
        let queries = certificate_queries("aCert9", DEFAULT_CURRICULAR_CERT_ID, DEFAULT_STUDENT_ID);

        let mut out = Vec::new();
        let err = query_certificates(
            &logger(),
            gateway,
            || Ok(offline_target(participant)),
            &queries,
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to decode the result of 'ReadAcaCert'."
        );
        assert!(diagnose(&err).0.unwrap().contains("aCert9"));
        let calls = calls.borrow();
        assert_eq!(calls.evaluated.len(), 1);
        assert_eq!(calls.disconnects, 1);
    }

    #[tokio::test]
    async fn issuing_a_certificate_sends_transcript_as_json() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let gateway = ScriptedGateway::new(&calls);
        let participant = ParticipantConfig {
            contract_namespace: Some("org.certs".to_string()),
            ..ParticipantConfig::admin()
        };
        let issuance = Issuance::AcademicCertificate {
            cert_id: "aCert3".to_string(),
            student_id: "SWE1904873".to_string(),
            student_name: "Shane".to_string(),
            transcript: vec!["SE101:A".to_string(), "SE102:B+".to_string()],
        };

        let mut out = Vec::new();
        issue_certificates(
            &logger(),
            gateway,
            || Ok(offline_target(participant)),
            &issuance,
            &mut out,
        )
        .await
        .unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.submitted.len(), 1);
        let request = &calls.submitted[0];
        assert_eq!(request.function, "org.certs:IssueAcaCert");
        assert_eq!(
            request.args,
            vec!["aCert3", "SWE1904873", "Shane", r#"["SE101:A","SE102:B+"]"#]
        );
        assert_eq!(calls.disconnects, 1);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn unreadable_profile_still_disconnects() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Calls::default()));
        let gateway = ScriptedGateway::new(&calls);
        let participant = ParticipantConfig {
            connection_profile: dir.path().join("connection-org1.yaml"),
            ..ParticipantConfig::user()
        };
        let wallet_dir = participant.wallet_dir(dir.path());
        let queries = certificate_queries(
            DEFAULT_ACADEMIC_CERT_ID,
            DEFAULT_CURRICULAR_CERT_ID,
            DEFAULT_STUDENT_ID,
        );

        let mut out = Vec::new();
        let err = query_certificates(
            &logger(),
            gateway,
            || GatewayTarget::load(participant, dir.path()),
            &queries,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("Failed to load connection profile"));
        assert!(diagnose(&err).1.unwrap().contains("--connection-profile"));
        let calls = calls.borrow();
        assert_eq!(calls.connects, 0);
        assert_eq!(calls.disconnects, 1);
        assert!(!wallet_dir.exists());
    }
}

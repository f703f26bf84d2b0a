//! Client for the Fabric CA enrollment API.
use crate::config::connection_profile::CaInfo;
use crate::error::ca::EnrollError::{
    CertificateNotBase64, GenerateKeyFailed, InvalidCertificate, MalformedResponse,
    MissingCertificate, Rejected, RequestFailed,
};
use crate::error::ca::{CaClientError, EnrollError};
use crate::error::reqwest::WrappedReqwestError;
use crate::identity::{generate_key_and_csr, validate_certificate_pem};
use protocol::{CaResponse, EnrollRequestBody, EnrollResult};
use slog::{debug, Logger};
use url::Url;

mod protocol;

pub use protocol::AttributeRequest;

const ENROLL_PATH: &str = "api/v1/enroll";

#[derive(Clone, Debug)]
pub struct EnrollmentRequest {
    pub enrollment_id: String,
    pub enrollment_secret: String,
    /// Signing profile on the CA, e.g. `tls`.
    pub profile: Option<String>,
    pub attr_reqs: Vec<AttributeRequest>,
}

impl EnrollmentRequest {
    pub fn new(enrollment_id: &str, enrollment_secret: &str) -> Self {
        Self {
            enrollment_id: enrollment_id.to_string(),
            enrollment_secret: enrollment_secret.to_string(),
            profile: None,
            attr_reqs: vec![],
        }
    }
}

/// The credential material returned by a successful enrollment.
#[derive(Clone, Debug)]
pub struct Enrollment {
    pub certificate: String,
    pub private_key: String,
    /// Name the CA reported for itself.
    pub ca_name: Option<String>,
}

pub struct CaClient {
    logger: Logger,
    http: reqwest::Client,
    enroll_url: Url,
    ca_name: Option<String>,
}

impl CaClient {
    /// Builds a client for the CA described in the connection profile.
    ///
    /// With `verify` set, the profile's PEM roots are the only trust anchors. Without it
    /// the server certificate is not checked at all.
    pub fn new(logger: &Logger, info: &CaInfo) -> Result<Self, CaClientError> {
        let invalid_url = |e| CaClientError::InvalidUrl(info.url.clone(), e);
        let mut base_url = Url::parse(&info.url).map_err(invalid_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let enroll_url = base_url.join(ENROLL_PATH).map_err(invalid_url)?;

        let mut builder = reqwest::Client::builder();
        if info.verify {
            let roots = reqwest::Certificate::from_pem_bundle(info.tls_roots.as_bytes())
                .map_err(|e| CaClientError::InvalidTlsRoots(WrappedReqwestError(e)))?;
            builder = builder.tls_built_in_root_certs(false);
            for root in roots {
                builder = builder.add_root_certificate(root);
            }
        } else {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| CaClientError::BuildHttpClientFailed(WrappedReqwestError(e)))?;

        Ok(Self {
            logger: logger.clone(),
            http,
            enroll_url,
            ca_name: info.ca_name.clone(),
        })
    }

    /// Generates a key pair, has the CA sign a certificate for it and returns both.
    pub async fn enroll(&self, request: &EnrollmentRequest) -> Result<Enrollment, EnrollError> {
        let generated = generate_key_and_csr(&request.enrollment_id).map_err(GenerateKeyFailed)?;

        let url = &self.enroll_url;
        let body = EnrollRequestBody {
            certificate_request: &generated.csr_pem,
            caname: self.ca_name.as_deref(),
            profile: request.profile.as_deref(),
            attr_reqs: &request.attr_reqs,
        };

        debug!(self.logger, "Sending enrollment request"; "url" => url.as_str(), "enrollment_id" => &request.enrollment_id);
        let response = self
            .http
            .post(url.clone())
            .basic_auth(&request.enrollment_id, Some(&request.enrollment_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| RequestFailed {
                url: url.to_string(),
                source: WrappedReqwestError(e),
            })?;

        let status = response.status();
        let parsed = response.json::<CaResponse<EnrollResult>>().await;
        let result = match parsed {
            Ok(body) if status.is_success() && body.success => {
                body.result.ok_or(MissingCertificate)?
            }
            Ok(body) => {
                return Err(Rejected {
                    enrollment_id: request.enrollment_id.clone(),
                    status: status.as_u16(),
                    messages: body.error_summary(),
                })
            }
            Err(e) if status.is_success() => {
                return Err(MalformedResponse(WrappedReqwestError(e)));
            }
            Err(_) => {
                return Err(Rejected {
                    enrollment_id: request.enrollment_id.clone(),
                    status: status.as_u16(),
                    messages: status.canonical_reason().unwrap_or("unknown").to_string(),
                })
            }
        };

        let certificate = decode_base64_pem(&result.cert)?;
        validate_certificate_pem(&certificate).map_err(InvalidCertificate)?;

        let ca_name = result.server_info.and_then(|info| info.ca_name);
        debug!(self.logger, "Enrollment succeeded"; "enrollment_id" => &request.enrollment_id);

        Ok(Enrollment {
            certificate,
            private_key: generated.private_key_pem,
            ca_name,
        })
    }
}

fn decode_base64_pem(encoded: &str) -> Result<String, EnrollError> {
    let bytes = base64::decode(encoded.trim()).map_err(CertificateNotBase64)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

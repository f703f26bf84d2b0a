//! Wire types of the Fabric CA REST API.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct EnrollRequestBody<'a> {
    pub certificate_request: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caname: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<&'a str>,

    #[serde(skip_serializing_if = "no_attributes")]
    pub attr_reqs: &'a [AttributeRequest],
}

fn no_attributes(attr_reqs: &&[AttributeRequest]) -> bool {
    attr_reqs.is_empty()
}

/// An attribute to embed in the enrollment certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeRequest {
    pub name: String,
    pub optional: bool,
}

/// Every CA response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct CaResponse<T> {
    #[serde(default)]
    pub success: bool,

    pub result: Option<T>,

    #[serde(default)]
    pub errors: Vec<CaMessage>,

    #[serde(default)]
    pub messages: Vec<CaMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaMessage {
    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub message: String,
}

impl<T> CaResponse<T> {
    pub fn error_summary(&self) -> String {
        let summary = self
            .errors
            .iter()
            .chain(self.messages.iter())
            .map(|m| format!("[{}] {}", m.code, m.message))
            .collect::<Vec<_>>()
            .join("; ");
        if summary.is_empty() {
            "no error details returned".to_string()
        } else {
            summary
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollResult {
    /// Base64 of the PEM certificate.
    #[serde(rename = "Cert")]
    pub cert: String,

    #[serde(rename = "ServerInfo", default)]
    pub server_info: Option<ServerInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerInfo {
    #[serde(rename = "CAName", default)]
    pub ca_name: Option<String>,
}

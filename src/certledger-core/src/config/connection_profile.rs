//! Fabric common connection profile.
//!
//! Only the parts needed to reach a certificate authority and a gateway peer are
//! modelled; unknown keys are ignored.
use crate::error::connection_profile::ConnectionProfileError;
use crate::error::connection_profile::ConnectionProfileError::{
    CertificateAuthorityNotFound, InvalidPeerUrl, LoadFailed, MissingCaTlsRoots, NoPeers,
    PeerNotFound, ReadTlsCertsFailed, UnsupportedPeerScheme,
};
use crate::json::load_yaml_file;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub client: Option<ClientSection>,

    #[serde(default)]
    pub organizations: BTreeMap<String, OrganizationConfig>,

    #[serde(default)]
    pub peers: BTreeMap<String, PeerConfig>,

    #[serde(default, rename = "certificateAuthorities")]
    pub certificate_authorities: BTreeMap<String, CertificateAuthorityConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClientSection {
    pub organization: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OrganizationConfig {
    pub mspid: Option<String>,

    #[serde(default)]
    pub peers: Vec<String>,

    #[serde(default, rename = "certificateAuthorities")]
    pub certificate_authorities: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PeerConfig {
    pub url: String,

    #[serde(default, rename = "tlsCACerts")]
    pub tls_ca_certs: Option<TlsCaCerts>,

    #[serde(default, rename = "grpcOptions")]
    pub grpc_options: GrpcOptions,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GrpcOptions {
    #[serde(default, rename = "ssl-target-name-override")]
    pub ssl_target_name_override: Option<String>,

    #[serde(default, rename = "hostnameOverride")]
    pub hostname_override: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CertificateAuthorityConfig {
    pub url: String,

    #[serde(default, rename = "caName")]
    pub ca_name: Option<String>,

    /// Some profiles carry the CA's TLS roots under this key instead of `tlsCACerts`.
    #[serde(default, rename = "caTLSCACerts")]
    pub ca_tls_ca_certs: Option<TlsCaCerts>,

    #[serde(default, rename = "tlsCACerts")]
    pub tls_ca_certs: Option<TlsCaCerts>,

    #[serde(default, rename = "httpOptions")]
    pub http_options: HttpOptions,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HttpOptions {
    #[serde(default)]
    pub verify: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TlsCaCerts {
    #[serde(default)]
    pub pem: Option<PemContent>,

    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `pem:` is written either as one block or as a list of blocks.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum PemContent {
    Single(String),
    Many(Vec<String>),
}

impl PemContent {
    pub fn joined(&self) -> String {
        match self {
            PemContent::Single(pem) => pem.clone(),
            PemContent::Many(pems) => pems.join("\n"),
        }
    }
}

impl TlsCaCerts {
    fn resolve(&self, owner: &str) -> Result<Option<String>, ConnectionProfileError> {
        if let Some(pem) = &self.pem {
            let pem = pem.joined();
            if !pem.trim().is_empty() {
                return Ok(Some(pem));
            }
        }
        match &self.path {
            Some(path) => crate::fs::read_to_string(path)
                .map(Some)
                .map_err(|e| ReadTlsCertsFailed(owner.to_string(), e)),
            None => Ok(None),
        }
    }
}

/// Everything needed to talk to one certificate authority.
#[derive(Clone, Debug)]
pub struct CaInfo {
    /// Key of the entry under `certificateAuthorities`.
    pub name: String,
    pub url: String,
    /// Name of the CA instance inside the server, sent as `caname`.
    pub ca_name: Option<String>,
    pub tls_roots: String,
    pub verify: bool,
}

/// A gateway peer endpoint, with the url already mapped to http(s).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerEndpoint {
    pub name: String,
    pub url: String,
    pub tls_roots: Option<String>,
    pub server_name_override: Option<String>,
}

impl PeerEndpoint {
    pub fn is_tls(&self) -> bool {
        self.url.starts_with("https://")
    }
}

impl ConnectionProfile {
    pub fn load(path: &Path) -> Result<Self, ConnectionProfileError> {
        load_yaml_file(path).map_err(LoadFailed)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn client_organization(&self) -> Option<&OrganizationConfig> {
        let org = self.client.as_ref()?.organization.as_ref()?;
        self.organizations.get(org)
    }

    pub fn certificate_authority(&self, name: &str) -> Result<CaInfo, ConnectionProfileError> {
        let ca = self
            .certificate_authorities
            .get(name)
            .ok_or_else(|| CertificateAuthorityNotFound(name.to_string()))?;

        let from_ca_key = match &ca.ca_tls_ca_certs {
            Some(certs) => certs.resolve(name)?,
            None => None,
        };
        let tls_roots = match from_ca_key {
            Some(pem) => Some(pem),
            None => match &ca.tls_ca_certs {
                Some(certs) => certs.resolve(name)?,
                None => None,
            },
        }
        .ok_or_else(|| MissingCaTlsRoots(name.to_string()))?;

        Ok(CaInfo {
            name: name.to_string(),
            url: ca.url.clone(),
            ca_name: ca.ca_name.clone(),
            tls_roots,
            verify: ca.http_options.verify,
        })
    }

    /// The peer used as gateway: the client organization's first peer, otherwise the
    /// first peer in the profile.
    pub fn gateway_peer(&self, as_localhost: bool) -> Result<PeerEndpoint, ConnectionProfileError> {
        let name = self
            .client_organization()
            .and_then(|org| org.peers.first())
            .or_else(|| self.peers.keys().next())
            .ok_or(NoPeers)?;
        self.peer_endpoint(name, as_localhost)
    }

    pub fn peer_endpoint(
        &self,
        name: &str,
        as_localhost: bool,
    ) -> Result<PeerEndpoint, ConnectionProfileError> {
        let peer = self
            .peers
            .get(name)
            .ok_or_else(|| PeerNotFound(name.to_string()))?;

        let mut url = Url::parse(&peer.url).map_err(|source| InvalidPeerUrl {
            peer: name.to_string(),
            url: peer.url.clone(),
            source,
        })?;
        let scheme = match url.scheme() {
            "grpcs" | "https" => "https",
            "grpc" | "http" => "http",
            other => {
                return Err(UnsupportedPeerScheme {
                    peer: name.to_string(),
                    scheme: other.to_string(),
                })
            }
        };
        let original_host = url.host_str().map(str::to_string);
        let host = if as_localhost {
            "localhost".to_string()
        } else {
            original_host.clone().unwrap_or_else(|| "localhost".to_string())
        };
        let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
        url = Url::parse(&format!("{scheme}://{host}{port}")).map_err(|source| {
            InvalidPeerUrl {
                peer: name.to_string(),
                url: peer.url.clone(),
                source,
            }
        })?;

        let tls_roots = match &peer.tls_ca_certs {
            Some(certs) => certs.resolve(name)?,
            None => None,
        };
        let server_name_override = peer
            .grpc_options
            .ssl_target_name_override
            .clone()
            .or_else(|| peer.grpc_options.hostname_override.clone())
            // A rewritten host still has to present the certificate of the profile's host.
            .or_else(|| original_host.filter(|_| as_localhost));

        Ok(PeerEndpoint {
            name: name.to_string(),
            url: url.as_str().trim_end_matches('/').to_string(),
            tls_roots,
            server_name_override,
        })
    }
}

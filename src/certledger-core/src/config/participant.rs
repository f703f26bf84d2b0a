use crate::error::structured_file::StructuredFileError;
use crate::json::load_json_file;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const ADMIN_PARTICIPANT: &str = "admin";
pub const USER_PARTICIPANT: &str = "user";

pub const DEFAULT_CHANNEL: &str = "test";
pub const DEFAULT_CHAINCODE: &str = "cert";

/// Everything one role needs to enroll and transact: which profile and CA to use,
/// where its wallet lives and which label it is stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipantConfig {
    pub connection_profile: PathBuf,
    pub ca_name: String,
    pub wallet_path: PathBuf,
    pub identity_label: String,
    pub msp_id: String,
    pub enrollment_id: String,
    pub enrollment_secret: String,

    #[serde(default = "default_channel")]
    pub channel: String,

    #[serde(default = "default_chaincode")]
    pub chaincode: String,

    /// Qualifies transaction names as `<namespace>:<name>` when set.
    #[serde(default)]
    pub contract_namespace: Option<String>,

    #[serde(default = "default_as_localhost")]
    pub as_localhost: bool,
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

fn default_chaincode() -> String {
    DEFAULT_CHAINCODE.to_string()
}

fn default_as_localhost() -> bool {
    true
}

impl ParticipantConfig {
    /// The issuing side: Org2, enrolled into the `isabella` wallet.
    pub fn admin() -> Self {
        Self {
            connection_profile: PathBuf::from("/gateway/connection-org2.yaml"),
            ca_name: "ca.org2.example.com".to_string(),
            wallet_path: PathBuf::from("identity/user/isabella/wallet"),
            identity_label: "isabella".to_string(),
            msp_id: "Org2MSP".to_string(),
            enrollment_id: "user1".to_string(),
            enrollment_secret: "user1pw".to_string(),
            channel: default_channel(),
            chaincode: default_chaincode(),
            contract_namespace: None,
            as_localhost: true,
        }
    }

    /// The querying side: Org1, enrolled into the `shane` wallet.
    pub fn user() -> Self {
        Self {
            connection_profile: PathBuf::from("/gateway/connection-org1.yaml"),
            ca_name: "ca.org1.example.com".to_string(),
            wallet_path: PathBuf::from("identity/user/shane/wallet"),
            identity_label: "shane".to_string(),
            msp_id: "Org1MSP".to_string(),
            enrollment_id: "user1".to_string(),
            enrollment_secret: "user1pw".to_string(),
            channel: default_channel(),
            chaincode: default_chaincode(),
            contract_namespace: None,
            as_localhost: true,
        }
    }

    /// Relative wallet paths are taken from the given base directory.
    pub fn wallet_dir(&self, base: &Path) -> PathBuf {
        if self.wallet_path.is_absolute() {
            self.wallet_path.clone()
        } else {
            base.join(&self.wallet_path)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertLedgerConfig {
    #[serde(default)]
    pub participants: BTreeMap<String, ParticipantConfig>,
}

impl Default for CertLedgerConfig {
    fn default() -> Self {
        let participants = BTreeMap::from([
            (ADMIN_PARTICIPANT.to_string(), ParticipantConfig::admin()),
            (USER_PARTICIPANT.to_string(), ParticipantConfig::user()),
        ]);
        Self { participants }
    }
}

impl CertLedgerConfig {
    /// Loads a config file on top of the built-in participants: entries in the file
    /// replace or extend the defaults.
    pub fn load(path: &Path) -> Result<Self, StructuredFileError> {
        let from_file: CertLedgerConfig = load_json_file(path)?;
        let mut config = CertLedgerConfig::default();
        config.participants.extend(from_file.participants);
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, StructuredFileError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn participant(&self, name: &str) -> Option<&ParticipantConfig> {
        self.participants.get(name)
    }
}

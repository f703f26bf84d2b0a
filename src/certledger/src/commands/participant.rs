use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use certledger_core::config::participant::ParticipantConfig;
use clap::Args;
use std::path::PathBuf;

/// Overrides for the participant a command runs as.
#[derive(Args, Clone, Debug, Default)]
pub struct ParticipantOpts {
    /// Configured participant to run as, instead of the command's default.
    #[arg(long)]
    participant: Option<String>,

    /// Path to the organization's connection profile (YAML).
    #[arg(long)]
    connection_profile: Option<PathBuf>,

    /// Wallet directory. Relative paths are taken from the current directory.
    #[arg(long)]
    wallet: Option<PathBuf>,

    /// Wallet label of the identity.
    #[arg(long)]
    identity: Option<String>,

    #[arg(long)]
    channel: Option<String>,

    #[arg(long)]
    chaincode: Option<String>,

    /// Contract namespace; transaction names are sent as `<namespace>:<name>`.
    #[arg(long)]
    namespace: Option<String>,

    /// Use peer hosts as written in the connection profile instead of `localhost`.
    #[arg(long)]
    no_localhost: bool,
}

impl ParticipantOpts {
    pub fn resolve(self, env: &dyn Environment, default: &str) -> CertResult<ParticipantConfig> {
        let name = self.participant.as_deref().unwrap_or(default);
        let mut participant = env.get_participant(name)?;
        if let Some(connection_profile) = self.connection_profile {
            participant.connection_profile = connection_profile;
        }
        if let Some(wallet) = self.wallet {
            participant.wallet_path = wallet;
        }
        if let Some(identity) = self.identity {
            participant.identity_label = identity;
        }
        if let Some(channel) = self.channel {
            participant.channel = channel;
        }
        if let Some(chaincode) = self.chaincode {
            participant.chaincode = chaincode;
        }
        if self.namespace.is_some() {
            participant.contract_namespace = self.namespace;
        }
        if self.no_localhost {
            participant.as_localhost = false;
        }
        Ok(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::environment::tests::TestEnvironment;
    use certledger_core::config::participant::{ADMIN_PARTICIPANT, USER_PARTICIPANT};
    use std::path::Path;

    #[test]
    fn defaults_come_from_the_named_participant() {
        let env = TestEnvironment::new(Path::new("/work"));
        let participant = ParticipantOpts::default()
            .resolve(&env, ADMIN_PARTICIPANT)
            .unwrap();
        assert_eq!(participant, ParticipantConfig::admin());
    }

    #[test]
    fn flags_override_single_fields() {
        let env = TestEnvironment::new(Path::new("/work"));
        let opts = ParticipantOpts {
            participant: Some(ADMIN_PARTICIPANT.to_string()),
            wallet: Some(PathBuf::from("wallets/isabella")),
            namespace: Some("org.certs".to_string()),
            no_localhost: true,
            ..Default::default()
        };
        let participant = opts.resolve(&env, USER_PARTICIPANT).unwrap();
        assert_eq!(participant.identity_label, "isabella");
        assert_eq!(participant.wallet_path, PathBuf::from("wallets/isabella"));
        assert_eq!(participant.contract_namespace.as_deref(), Some("org.certs"));
        assert!(!participant.as_localhost);
        assert_eq!(participant.channel, "test");
    }
}

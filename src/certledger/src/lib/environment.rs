use crate::lib::error::CertResult;
use anyhow::{bail, Context};
use certledger_core::config::participant::{CertLedgerConfig, ParticipantConfig};
use slog::Logger;
use std::path::{Path, PathBuf};

pub trait Environment {
    fn get_logger(&self) -> &Logger;
    fn get_config(&self) -> &CertLedgerConfig;

    /// Base directory for relative wallet paths.
    fn get_working_dir(&self) -> &Path;

    fn get_participant(&self, name: &str) -> CertResult<ParticipantConfig> {
        match self.get_config().participant(name) {
            Some(participant) => Ok(participant.clone()),
            None => {
                let known: Vec<&str> = self
                    .get_config()
                    .participants
                    .keys()
                    .map(String::as_str)
                    .collect();
                bail!(
                    "Unknown participant '{}'. Configured participants: {}",
                    name,
                    known.join(", ")
                )
            }
        }
    }
}

pub struct EnvironmentImpl {
    config: CertLedgerConfig,
    working_dir: PathBuf,
    logger: Logger,
}

impl EnvironmentImpl {
    pub fn new(config_path: Option<&Path>) -> CertResult<Self> {
        let config = CertLedgerConfig::load_or_default(config_path)
            .context("Failed to load certledger configuration.")?;
        let working_dir =
            std::env::current_dir().context("Failed to determine the current directory.")?;
        Ok(EnvironmentImpl {
            config,
            working_dir,
            logger: Logger::root(slog::Discard, slog::o!()),
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }
}

impl Environment for EnvironmentImpl {
    fn get_logger(&self) -> &Logger {
        &self.logger
    }

    fn get_config(&self) -> &CertLedgerConfig {
        &self.config
    }

    fn get_working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use certledger_core::config::participant::{ADMIN_PARTICIPANT, USER_PARTICIPANT};

    pub(crate) struct TestEnvironment {
        pub config: CertLedgerConfig,
        pub working_dir: PathBuf,
        pub logger: Logger,
    }

    impl TestEnvironment {
        pub fn new(working_dir: &Path) -> Self {
            Self {
                config: CertLedgerConfig::default(),
                working_dir: working_dir.to_path_buf(),
                logger: Logger::root(slog::Discard, slog::o!()),
            }
        }
    }

    impl Environment for TestEnvironment {
        fn get_logger(&self) -> &Logger {
            &self.logger
        }

        fn get_config(&self) -> &CertLedgerConfig {
            &self.config
        }

        fn get_working_dir(&self) -> &Path {
            &self.working_dir
        }
    }

    #[test]
    fn resolves_builtin_participants() {
        let env = TestEnvironment::new(Path::new("/tmp"));
        assert_eq!(
            env.get_participant(ADMIN_PARTICIPANT).unwrap().identity_label,
            "isabella"
        );
        assert_eq!(
            env.get_participant(USER_PARTICIPANT).unwrap().identity_label,
            "shane"
        );
    }

    #[test]
    fn unknown_participant_lists_known_ones() {
        let env = TestEnvironment::new(Path::new("/tmp"));
        let err = env.get_participant("registrar").unwrap_err().to_string();
        assert!(err.contains("registrar"));
        assert!(err.contains("admin, user"));
    }
}

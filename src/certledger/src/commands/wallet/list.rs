use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use anyhow::Context;
use certledger_core::wallet::{FileSystemWallet, Wallet};
use clap::Parser;
use std::io::Write;

/// Lists the identities held in participant wallets. The participant's own identity is
/// marked with '*'.
#[derive(Parser)]
pub struct ListOpts {
    /// Only list this participant's wallet.
    #[arg(long)]
    participant: Option<String>,
}

pub fn exec(env: &dyn Environment, opts: ListOpts) -> CertResult {
    let mut stdout = std::io::stdout();
    list_wallets(env, opts.participant.as_deref(), &mut stdout)
}

fn list_wallets(env: &dyn Environment, only: Option<&str>, out: &mut dyn Write) -> CertResult {
    let names: Vec<String> = match only {
        Some(name) => vec![name.to_string()],
        None => env.get_config().participants.keys().cloned().collect(),
    };

    for name in names {
        let participant = env.get_participant(&name)?;
        let wallet_path = participant.wallet_dir(env.get_working_dir());
        if !wallet_path.is_dir() {
            writeln!(out, "{name}: no wallet at {}", wallet_path.display())?;
            continue;
        }

        let wallet = FileSystemWallet::new(&wallet_path)?;
        let labels = wallet
            .list()
            .with_context(|| format!("Failed to list wallet of '{name}'."))?;
        writeln!(out, "{name}: {}", wallet.path().display())?;
        for label in labels {
            if label == participant.identity_label {
                writeln!(out, "  {label} *")?;
            } else {
                writeln!(out, "  {label}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::environment::tests::TestEnvironment;
    use certledger_core::config::participant::ParticipantConfig;
    use certledger_core::identity::X509Identity;

    #[test]
    fn lists_labels_and_marks_own_identity() {
        let dir = tempfile::tempdir().unwrap();
        let env = TestEnvironment::new(dir.path());
        let wallet =
            FileSystemWallet::new(&ParticipantConfig::user().wallet_dir(dir.path())).unwrap();
        let identity = X509Identity::new("cert".to_string(), "key".to_string(), "Org1MSP");
        wallet.put("shane", &identity).unwrap();
        wallet.put("auditor", &identity).unwrap();

        let mut out = Vec::new();
        list_wallets(&env, None, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(printed.contains("admin: no wallet at"));
        assert!(printed.contains("user: "));
        assert!(printed.contains("  auditor\n  shane *\n"));
    }

    #[test]
    fn unknown_participant_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut out = Vec::new();
        assert!(list_wallets(&env, Some("registrar"), &mut out).is_err());
    }
}

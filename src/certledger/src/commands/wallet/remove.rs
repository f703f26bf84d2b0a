use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use anyhow::{bail, Context};
use certledger_core::wallet::{FileSystemWallet, Wallet};
use clap::Parser;
use slog::info;
use std::path::PathBuf;

/// Removes an identity from a participant's wallet. The participant's enroll command
/// enrolls it again afterwards.
#[derive(Parser)]
pub struct RemoveOpts {
    /// The wallet label to remove.
    label: String,

    /// Participant whose wallet holds the identity.
    #[arg(long)]
    participant: String,
}

pub fn exec(env: &dyn Environment, opts: RemoveOpts) -> CertResult {
    let wallet_path = remove_identity(env, &opts.participant, &opts.label)?;
    info!(
        env.get_logger(),
        r#"Removed identity "{}" from {}."#,
        opts.label,
        wallet_path.display()
    );
    Ok(())
}

fn remove_identity(env: &dyn Environment, name: &str, label: &str) -> CertResult<PathBuf> {
    let participant = env.get_participant(name)?;
    let wallet_path = participant.wallet_dir(env.get_working_dir());
    if !wallet_path.is_dir() {
        bail!("Participant '{name}' has no wallet at {}.", wallet_path.display());
    }

    let wallet = FileSystemWallet::new(&wallet_path)?;
    let removed = wallet
        .remove(label)
        .with_context(|| format!("Failed to remove '{label}' from the wallet of '{name}'."))?;
    if !removed {
        bail!(
            "The wallet at {} holds no identity labelled '{label}'.",
            wallet.path().display()
        );
    }
    Ok(wallet.path().to_path_buf())
}

use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use clap::{Parser, Subcommand};

mod list;
mod remove;

/// Lists or removes identities in participant wallets.
#[derive(Parser)]
pub struct WalletOpts {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    List(list::ListOpts),
    Remove(remove::RemoveOpts),
}

pub fn exec(env: &dyn Environment, opts: WalletOpts) -> CertResult {
    match opts.subcmd {
        SubCommand::List(v) => list::exec(env, v),
        SubCommand::Remove(v) => remove::exec(env, v),
    }
}

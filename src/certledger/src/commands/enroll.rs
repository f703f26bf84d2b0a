use crate::commands::new_runtime;
use crate::commands::participant::ParticipantOpts;
use crate::lib::environment::Environment;
use crate::lib::error::CertResult;
use crate::lib::operations::enrollment::enroll_participant;
use certledger_core::ca::AttributeRequest;
use clap::Parser;

/// Enrolls the participant with its organization's certificate authority and imports the
/// identity into its wallet. Does nothing if the wallet already holds the identity.
#[derive(Parser)]
pub struct EnrollOpts {
    #[command(flatten)]
    participant: ParticipantOpts,

    /// Name of the certificate authority entry in the connection profile.
    #[arg(long)]
    ca_name: Option<String>,

    /// MSP id recorded with the identity.
    #[arg(long)]
    msp_id: Option<String>,

    #[arg(long)]
    enrollment_id: Option<String>,

    #[arg(long, env = "CERTLEDGER_ENROLLMENT_SECRET", hide_env_values = true)]
    enrollment_secret: Option<String>,

    /// Signing profile on the certificate authority, e.g. `tls`.
    #[arg(long)]
    ca_profile: Option<String>,

    /// Attribute to embed in the certificate. Append `:opt` if the CA may leave it out.
    #[arg(long = "attr", value_name = "NAME[:opt]")]
    attributes: Vec<String>,
}

impl EnrollOpts {
    fn attribute_requests(&self) -> Vec<AttributeRequest> {
        self.attributes
            .iter()
            .map(|attr| match attr.strip_suffix(":opt") {
                Some(name) => AttributeRequest {
                    name: name.to_string(),
                    optional: true,
                },
                None => AttributeRequest {
                    name: attr.clone(),
                    optional: false,
                },
            })
            .collect()
    }
}

pub fn exec(env: &dyn Environment, opts: EnrollOpts, default_participant: &str) -> CertResult {
    let attributes = opts.attribute_requests();
    let mut participant = opts.participant.resolve(env, default_participant)?;
    if let Some(ca_name) = opts.ca_name {
        participant.ca_name = ca_name;
    }
    if let Some(msp_id) = opts.msp_id {
        participant.msp_id = msp_id;
    }
    if let Some(enrollment_id) = opts.enrollment_id {
        participant.enrollment_id = enrollment_id;
    }
    if let Some(enrollment_secret) = opts.enrollment_secret {
        participant.enrollment_secret = enrollment_secret;
    }

    let runtime = new_runtime()?;
    runtime.block_on(enroll_participant(
        env.get_logger(),
        &participant,
        env.get_working_dir(),
        opts.ca_profile.as_deref(),
        &attributes,
    ))?;
    Ok(())
}

use super::{ConnectOptions, Gateway, Network};
use crate::config::connection_profile::ConnectionProfile;
use crate::error::gateway::GatewayError;
use slog::{info, Logger};
use std::ops::Deref;

/// Owns a gateway for the length of one flow and disconnects it when dropped, whether
/// the flow succeeded, failed or never connected.
pub struct GatewaySession<G: Gateway> {
    logger: Logger,
    gateway: G,
}

impl<G: Gateway> GatewaySession<G> {
    pub fn new(logger: &Logger, gateway: G) -> Self {
        Self {
            logger: logger.clone(),
            gateway,
        }
    }

    pub async fn connect(
        &mut self,
        profile: &ConnectionProfile,
        options: &ConnectOptions<'_>,
    ) -> Result<(), GatewayError> {
        self.gateway.connect(profile, options).await
    }

    pub fn network(&self, channel: &str) -> Network<'_, G> {
        self.gateway.network(channel)
    }
}

impl<G: Gateway> Deref for GatewaySession<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.gateway
    }
}

impl<G: Gateway> Drop for GatewaySession<G> {
    fn drop(&mut self) {
        info!(self.logger, "Disconnect from Fabric gateway.");
        self.gateway.disconnect();
    }
}

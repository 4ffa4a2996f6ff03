use api::resources::DaemonStatus;
use api::{ClientConfig, DaemonControl, RequestContext, Result};
use async_trait::async_trait;
use reqwest::Method;

use crate::version::VersionNegotiator;
use crate::HttpClient;

const PING: &str = "/api/v1/ping";
const STATUS: &str = "/api/v1/status";
const SHUTDOWN: &str = "/api/v1/shutdown";

#[async_trait]
impl DaemonControl for HttpClient {
    fn set_options(&self, config: ClientConfig) {
        HttpClient::set_options(self, config);
    }

    async fn ping(&self, ctx: &RequestContext) -> Result<()> {
        self.send::<()>(ctx, Method::GET, PING, None).await
    }

    async fn status(&self, ctx: &RequestContext) -> Result<DaemonStatus> {
        self.get(ctx, STATUS).await
    }

    async fn shutdown(&self, ctx: &RequestContext) -> Result<()> {
        self.send::<()>(ctx, Method::POST, SHUTDOWN, None).await
    }

    async fn check_version_compatibility(
        &self,
        ctx: &RequestContext,
        client_version: &str,
    ) -> Result<()> {
        VersionNegotiator::new(client_version)
            .negotiate(ctx, self)
            .await
            .map(drop)
    }
}

//! The daemon client handle and its generic request helpers.

use std::sync::Arc;

use api::{ClientConfig, ClientError, Operation, RequestContext, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config_store::ConfigStore;
use crate::request::{PreparedRequest, RequestBuilder};
use crate::response::{self, RawResponse};
use crate::settings::{ClientSettings, TransportOptions};
use crate::transport::TransportExecutor;

/// HTTP client for the workstation daemon.
///
/// Cheap to clone; clones share the connection pool and the configuration,
/// so a `set_options` on one is seen by all of them.
///
/// Every typed capability method is a thin call into [`HttpClient::call`],
/// [`HttpClient::send`] or their variants; [`HttpClient::raw_request`] covers
/// routes without a typed wrapper.
#[derive(Debug, Clone)]
pub struct HttpClient {
    store: Arc<ConfigStore>,
    builder: RequestBuilder,
    transport: TransportExecutor,
}

impl HttpClient {
    /// Creates a client with default transport options and no identity.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, ClientConfig::default())
    }

    /// Creates a client with default transport options.
    pub fn with_options(base_url: &str, config: ClientConfig) -> Result<Self> {
        Self::with_transport(base_url, config, &TransportOptions::default())
    }

    /// Creates a client with explicit transport options.
    pub fn with_transport(
        base_url: &str,
        config: ClientConfig,
        transport: &TransportOptions,
    ) -> Result<Self> {
        let store = Arc::new(ConfigStore::new(config));
        let builder = RequestBuilder::new(base_url, Arc::clone(&store))?;
        let transport = TransportExecutor::new(transport)?;
        tracing::debug!(base_url = builder.base_url(), "daemon client created");
        Ok(Self {
            store,
            builder,
            transport,
        })
    }

    /// Creates a client from loaded settings.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::with_transport(
            &settings.base_url,
            settings.options.clone(),
            &settings.transport,
        )
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.builder.base_url()
    }

    /// Replaces the identity/auth options for every later request.
    pub fn set_options(&self, config: ClientConfig) {
        self.store.set_options(config);
    }

    /// Current identity/auth options.
    pub fn options(&self) -> Arc<ClientConfig> {
        self.store.snapshot()
    }

    /// Headers the next request will carry, besides `Content-Type`.
    pub fn get_headers(&self) -> Vec<(&'static str, String)> {
        self.store.get_headers()
    }

    /// The most recently dispatched operation.
    pub fn last_operation(&self) -> Option<Operation> {
        self.store.last_operation()
    }

    // -----------------------------------------------------------------------
    // Generic helpers
    // -----------------------------------------------------------------------

    /// Sends a request and decodes the success body into `T`.
    ///
    /// A 204 answer yields `T::default()`.
    pub async fn call<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let (operation, raw) = self.exchange(ctx, method, path, body).await?;
        response::decode(&operation, raw)
    }

    /// Sends a request and decodes the success body into `destination`,
    /// which a 204 answer leaves untouched.
    pub async fn call_into<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
        destination: &mut T,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (operation, raw) = self.exchange(ctx, method, path, body).await?;
        response::decode_into(&operation, raw, destination)
    }

    /// Sends a request and discards any success body.
    pub async fn send<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let (operation, raw) = self.exchange(ctx, method, path, body).await?;
        response::check(&operation, raw)
    }

    /// `GET` shorthand for [`HttpClient::call`].
    pub async fn get<T>(&self, ctx: &RequestContext, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.call::<(), T>(ctx, Method::GET, path, None).await
    }

    /// Sends an arbitrary request through the standard pipeline and returns
    /// the success body verbatim (empty for 204).
    ///
    /// `method` is any HTTP verb, case-insensitive.
    pub async fn raw_request(
        &self,
        ctx: &RequestContext,
        method: &str,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Vec<u8>> {
        let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| ClientError::invalid(format!("invalid HTTP method {method:?}")))?;
        let (operation, raw) = self.exchange(ctx, method, path, body).await?;
        response::into_bytes(&operation, raw)
    }

    async fn exchange<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(Operation, RawResponse)>
    where
        B: Serialize + ?Sized,
    {
        let request: PreparedRequest = self.builder.build(method, path, body)?;
        let raw = self.transport.execute(ctx, &request).await?;
        Ok((request.operation().clone(), raw))
    }
}

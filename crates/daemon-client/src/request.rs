//! Request construction: paths, body encoding and header injection.

use std::sync::Arc;

use api::{ClientError, Operation, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::Serialize;

use crate::config_store::ConfigStore;

/// Characters left unescaped in a path segment or query component
/// (RFC 3986 unreserved set).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const JSON: &str = "application/json";

// ---------------------------------------------------------------------------
// Endpoint paths
// ---------------------------------------------------------------------------

/// Builds a request path from fixed route pieces and escaped identifiers.
///
/// ```
/// use daemon_client::Endpoint;
///
/// let path = Endpoint::new("/api/v1/instances")
///     .segment("my box")
///     .literal("start")
///     .build();
/// assert_eq!(path, "/api/v1/instances/my%20box/start");
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    path: String,
    query: Vec<(&'static str, String)>,
}

impl Endpoint {
    /// Starts from a fixed route such as `/api/v1/volumes`.
    pub fn new(route: &'static str) -> Self {
        Self {
            path: route.trim_end_matches('/').to_string(),
            query: Vec::new(),
        }
    }

    /// Appends a caller-supplied value as one escaped path segment.
    pub fn segment(mut self, value: &str) -> Self {
        self.path.push('/');
        self.path
            .push_str(&utf8_percent_encode(value, COMPONENT).to_string());
        self
    }

    /// Appends a fixed route piece verbatim.
    pub fn literal(mut self, piece: &'static str) -> Self {
        self.path.push('/');
        self.path.push_str(piece.trim_matches('/'));
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Adds every pair in order.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Renders the path with its query string, if any.
    pub fn build(self) -> String {
        if self.query.is_empty() {
            return self.path;
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, COMPONENT)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

// ---------------------------------------------------------------------------
// Prepared request
// ---------------------------------------------------------------------------

/// A fully built request, ready for the transport.
///
/// Headers are frozen at build time: a later `set_options` call does not
/// affect a request that has already been prepared.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    url: String,
    operation: Operation,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `"METHOD PATH"` label errors are reported against.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Encoded JSON body, if one was supplied.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Whether repeating the request has no additional effect on the daemon.
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self.method,
            Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
        )
    }
}

// ---------------------------------------------------------------------------
// Request builder
// ---------------------------------------------------------------------------

/// Turns `(method, path, body)` into a [`PreparedRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    store: Arc<ConfigStore>,
}

impl RequestBuilder {
    /// Creates a builder for `base_url`; a trailing slash is dropped.
    pub fn new(base_url: &str, store: Arc<ConfigStore>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(base_url)
            .map_err(|err| ClientError::invalid(format!("invalid base URL {base_url:?}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::invalid(format!(
                "unsupported base URL scheme {:?}",
                parsed.scheme()
            )));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encodes the body, snapshots the configuration and assembles headers.
    ///
    /// A body that fails to encode is reported immediately; nothing is
    /// recorded and nothing is sent.
    pub fn build<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<PreparedRequest>
    where
        B: Serialize + ?Sized,
    {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let operation = Operation::new(method.as_str(), path.as_str());

        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|source| ClientError::Serialization {
                operation: operation.clone(),
                source,
            })?;

        let config = self.store.begin(&operation);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        for (name, value) in config.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| ClientError::invalid(format!("invalid header name {name}: {err}")))?;
            let mut value = HeaderValue::from_str(value).map_err(|_| {
                ClientError::invalid(format!("value for header {name} contains invalid characters"))
            })?;
            if name.as_str().eq_ignore_ascii_case(api::API_KEY_HEADER)
                || name.as_str().eq_ignore_ascii_case(api::INVITATION_TOKEN_HEADER)
            {
                value.set_sensitive(true);
            }
            // Content-Type is fixed; configuration never replaces it.
            headers.entry(name).or_insert(value);
        }

        Ok(PreparedRequest {
            url: format!("{}{}", self.base_url, path),
            method,
            operation,
            headers,
            body,
        })
    }
}

//! Workstation daemon HTTP adapter.
//!
//! Implements every capability trait of the [`api`] crate over HTTP/JSON
//! with `reqwest`. Callers normally only touch [`HttpClient`] and the
//! settings types; the pipeline stages are public so they can be tested and
//! reused on their own.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection pooling, header injection, body encoding,
//! status classification, decoding, retries and version negotiation live
//! here. The [`api`] crate sees none of it.
//!
//! ## Request pipeline
//!
//! ```text
//! caller ─► RequestBuilder ─► TransportExecutor ─► ResponseOutcome ─► T | ClientError
//!               ▲
//!          ConfigStore
//! ```
//!
//! | Module | Stage |
//! |--------|-------|
//! | [`config_store`] | Identity/auth snapshot and last operation |
//! | [`request`] | Route rendering, JSON body, header injection |
//! | [`transport`] | Pooled execution, cancellation, deadlines, retry |
//! | [`response`] | Status classification and decoding |
//! | [`version`] | Client/daemon version negotiation |
//! | [`settings`] | Transport options, TOML file and environment |

pub mod client;
pub mod config_store;
mod endpoints;
pub mod request;
pub mod response;
pub mod settings;
pub mod transport;
pub mod version;

pub use client::HttpClient;
pub use config_store::ConfigStore;
pub use request::{Endpoint, PreparedRequest, RequestBuilder};
pub use response::{RawResponse, ResponseOutcome};
pub use settings::{ClientSettings, SettingsError, TransportOptions, DEFAULT_DAEMON_URL};
pub use transport::TransportExecutor;
pub use version::VersionNegotiator;

/// HTTP verb type accepted by the generic helpers.
pub use reqwest::Method;

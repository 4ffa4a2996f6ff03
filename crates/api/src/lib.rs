//! Domain layer of the workstation daemon client.
//!
//! This crate holds every type that crosses the client boundary: newtype
//! resource identifiers, the JSON wire bodies, the error taxonomy, the
//! version compatibility rule, and the capability traits a client
//! implements. Infrastructure crates implement the traits defined here; they
//! never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Domain types + port definitions.** This crate performs no I/O. It
//! defines *what* a daemon client offers; `daemon-client` defines *how* it
//! is reached over HTTP.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Non-empty newtype identifiers (`InstanceName`, `ProjectId`, etc.) |
//! | [`types`] | `Operation`, `Version`, `Timestamp` |
//! | [`config`] | `ClientConfig` and its header mapping |
//! | [`context`] | `RequestContext` (cancellation + deadline) |
//! | [`errors`] | `ClientError`, `RetryPolicy`, version remedies |
//! | [`resources`] | Request and response bodies per daemon resource |
//! | [`ports`] | Capability traits and the `WorkstationApi` umbrella |

pub mod config;
pub mod context;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod resources;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{
    ClientConfig, API_KEY_HEADER, INVITATION_TOKEN_HEADER, OWNER_ACCOUNT_HEADER, PROFILE_HEADER,
    REGION_HEADER, STORAGE_CONFIG_PATH_HEADER,
};
pub use context::RequestContext;
pub use errors::{BoxError, ClientError, Incompatibility, Remedy, Result, RetryPolicy};
pub use identifiers::{
    AmiCreationId, InstanceName, PolicyId, ProjectId, StorageName, TemplateName, UserId,
    VolumeName,
};
pub use ports::{
    DaemonControl, ImagesApi, InstanceLifecycle, PoliciesApi, ProjectsApi, StorageApi,
    WorkstationApi,
};
pub use types::{Operation, Timestamp, Version};

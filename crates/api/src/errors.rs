//! Error taxonomy and retry-policy types for daemon client calls.
//!
//! [`ClientError`] is the single error type returned by every capability
//! trait method. Each variant corresponds to one failure class of the
//! request pipeline, so callers can match on the class instead of parsing
//! messages.
//!
//! [`RetryPolicy`] is a cross-cutting concern: the transport consults
//! [`ClientError::retry_policy`] to decide whether an idempotent request may
//! be re-issued.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Operation, Version};

/// Boxed error used for transport failures whose concrete type belongs to
/// the infrastructure crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used throughout the workspace.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable`: connection failures, transport timeouts, HTTP 429, 502,
///   503 and 504.
/// - `NonRetryable`: everything else, including cancellation, local
///   validation, serialization, decode, and version incompatibility.
///
/// A `Retryable` policy is necessary but not sufficient: only idempotent
/// verbs are ever re-issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }

    /// Policy for an HTTP status received from the daemon.
    pub fn for_status(status: u16) -> Self {
        match status {
            429 | 502 | 503 | 504 => Self::Retryable { after: None },
            _ => Self::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Version skew
// ---------------------------------------------------------------------------

/// Why a client/daemon version pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Incompatibility {
    /// Client and daemon are on different major lines.
    MajorMismatch,
    /// Same major line, but the client's minor version is newer than the
    /// daemon's.
    ClientAhead,
}

impl std::fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MajorMismatch => write!(f, "client and daemon have incompatible major versions"),
            Self::ClientAhead => write!(f, "client is newer than the daemon"),
        }
    }
}

/// Corrective action class attached to a version-incompatibility error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remedy {
    /// The daemon is older than the client requires.
    UpgradeDaemon,
    /// The client is older than the daemon's major line.
    UpgradeClient,
}

impl std::fmt::Display for Remedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpgradeDaemon => write!(
                f,
                "upgrade the daemon (stop it and restart it from the current installation)"
            ),
            Self::UpgradeClient => write!(f, "upgrade the client to the daemon's major version"),
        }
    }
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Errors produced by the daemon request pipeline.
///
/// Every variant that originates from a request carries the [`Operation`]
/// (`"METHOD PATH"`) it was produced for, so the message is diagnosable
/// without re-running the call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The caller supplied an argument that cannot form a valid request
    /// (empty identifier, malformed header value, bad base URL).
    ///
    /// Produced before any network activity.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of what was rejected.
        message: String,
    },

    /// The request body could not be encoded as JSON. No network call was
    /// attempted.
    #[error("failed to marshal request body for {operation}: {source}")]
    Serialization {
        /// Operation the body was built for.
        operation: Operation,
        /// Underlying encoder failure.
        #[source]
        source: serde_json::Error,
    },

    /// DNS, dial, TLS or connection-level failure. No HTTP status was
    /// received.
    #[error("transport error for {operation}: {source}")]
    Transport {
        /// Operation that was in flight.
        operation: Operation,
        /// `true` when the connection could not be established at all.
        connect: bool,
        /// Underlying transport failure.
        #[source]
        source: BoxError,
    },

    /// The caller's cancellation signal fired before or during the call.
    #[error("request cancelled for {operation}")]
    Cancelled {
        /// Operation that was abandoned.
        operation: Operation,
    },

    /// The caller's deadline or the configured request timeout expired.
    #[error("request timeout for {operation}: deadline exceeded")]
    Timeout {
        /// Operation that was abandoned.
        operation: Operation,
    },

    /// The daemon answered with a status code of 400 or above.
    ///
    /// `body` is the raw response body, verbatim.
    #[error("API error {status} for {operation}: {body}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Operation that was rejected.
        operation: Operation,
        /// Raw response body.
        body: String,
    },

    /// The daemon answered with a success status but the body did not match
    /// the expected shape.
    #[error("failed to decode response for {operation}: {source}")]
    Decode {
        /// Operation whose response failed to decode.
        operation: Operation,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The daemon status response carried no version field.
    #[error("daemon did not return version information")]
    MissingDaemonVersion,

    /// Client and daemon versions cannot interoperate.
    #[error(
        "version mismatch: client version v{client}, daemon version v{daemon}: {reason}; to fix this, {remedy}"
    )]
    VersionIncompatible {
        /// Version reported by the client.
        client: Version,
        /// Version reported by the daemon.
        daemon: Version,
        /// Which compatibility rule failed.
        reason: Incompatibility,
        /// Corrective action class.
        remedy: Remedy,
    },
}

impl ClientError {
    /// Builds a [`ClientError::InvalidRequest`] from any displayable message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for [`ClientError::Http`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the operation the error was produced for, when there is one.
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            Self::Serialization { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Cancelled { operation }
            | Self::Timeout { operation }
            | Self::Http { operation, .. }
            | Self::Decode { operation, .. } => Some(operation),
            Self::InvalidRequest { .. }
            | Self::MissingDaemonVersion
            | Self::VersionIncompatible { .. } => None,
        }
    }

    /// Returns `true` if the caller's cancellation signal aborted the call.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` if a deadline or request timeout aborted the call.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Classifies this error for the retry loop.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { connect: true, .. } | Self::Timeout { .. } => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Http { status, .. } => RetryPolicy::for_status(*status),
            _ => RetryPolicy::NonRetryable,
        }
    }
}

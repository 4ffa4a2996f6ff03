//! Shared value types for the daemon client.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! behaviour: [`Version`] owns the compatibility rule, [`Operation`] is the
//! diagnostic label threaded through every error.

use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClientError, Incompatibility, Remedy};

// ---------------------------------------------------------------------------
// Operation context
// ---------------------------------------------------------------------------

/// The `"METHOD PATH"` label of one request.
///
/// Captured when the request is built and carried into any error it
/// produces. `path` includes the query string, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    method: String,
    path: String,
}

impl Operation {
    /// Creates an operation label from an HTTP verb and a request path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Returns the HTTP verb.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path (with query string).
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Semantic version of a client build or a running daemon.
///
/// Parsing is deliberately lenient: a malformed string degrades to zero
/// components so that the mismatch surfaces as an actionable
/// [`ClientError::VersionIncompatible`] rather than a parse error.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    /// Major version: bumped on breaking changes.
    pub major: u64,
    /// Minor version: bumped on additive changes.
    pub minor: u64,
    /// Patch version: never consulted for compatibility.
    pub patch: u64,
}

impl Version {
    /// Creates a new [`Version`].
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `"v1.2.3"`, `"1.2.3"` or `"1.2"`.
    ///
    /// A string with fewer than two dot-separated components yields `0.0.0`;
    /// any individual component that is not a non-negative integer yields 0.
    pub fn parse_lenient(value: &str) -> Self {
        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() < 2 {
            return Self::default();
        }

        let component = |index: usize| {
            parts
                .get(index)
                .and_then(|part| part.parse::<u64>().ok())
                .unwrap_or(0)
        };
        Self::new(component(0), component(1), component(2))
    }

    /// Applies the compatibility rule with `self` as the client and `daemon`
    /// as the server, returning which rule failed.
    ///
    /// Compatibility requires the same major version and
    /// `daemon.minor >= self.minor`; patch is ignored.
    pub fn check_against(self, daemon: Version) -> Result<(), Incompatibility> {
        if self.major != daemon.major {
            Err(Incompatibility::MajorMismatch)
        } else if self.minor > daemon.minor {
            Err(Incompatibility::ClientAhead)
        } else {
            Ok(())
        }
    }

    /// Like [`Version::check_against`], but produces the user-facing error
    /// with the corrective action filled in.
    pub fn negotiate(self, daemon: Version) -> Result<(), ClientError> {
        self.check_against(daemon).map_err(|reason| {
            let remedy = match reason {
                Incompatibility::MajorMismatch if self.major < daemon.major => Remedy::UpgradeClient,
                Incompatibility::MajorMismatch | Incompatibility::ClientAhead => {
                    Remedy::UpgradeDaemon
                }
            };
            ClientError::VersionIncompatible {
                client: self,
                daemon,
                reason,
                remedy,
            }
        })
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// An RFC 3339 instant from a daemon payload (launch times, schedules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

//! Daemon health and identity.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Response of `GET /api/v1/status`.
///
/// `version` is optional: older or misbehaving daemons may omit it, in which
/// case version negotiation fails with
/// [`ClientError::MissingDaemonVersion`](crate::ClientError::MissingDaemonVersion).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonStatus {
    /// Daemon build version, e.g. `"v0.5.4"`.
    pub version: Option<String>,
    /// Lifecycle state, `"running"` when healthy.
    pub status: String,
    /// When the daemon process started.
    pub start_time: Option<Timestamp>,
    /// Human-readable uptime.
    pub uptime: String,
    /// Number of operations currently executing.
    pub active_ops: u32,
    /// Requests served since start.
    pub total_requests: u64,
    /// Recent request rate.
    pub requests_per_minute: f64,
    /// Region the daemon operates in.
    pub aws_region: String,
    /// Credentials profile the daemon operates with.
    pub aws_profile: String,
}

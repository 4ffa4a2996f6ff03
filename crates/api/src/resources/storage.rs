//! Shared volumes and block storage bodies.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Body of `POST /api/v1/volumes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeCreateRequest {
    pub name: String,
    /// `"generalPurpose"` or `"maxIO"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_mode: Option<String>,
    /// `"bursting"` or `"provisioned"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Body of `POST /api/v1/storage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCreateRequest {
    pub name: String,
    /// T-shirt size or an explicit size in GB.
    pub size: String,
    /// Volume type, e.g. `"gp3"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Body of the `.../attach` storage and volume routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachRequest {
    pub instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_point: Option<String>,
}

/// A shared or block volume as reported by the daemon.
///
/// Both storage families share one shape; fields that only apply to one
/// family are absent for the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageVolume {
    pub name: String,
    /// `"shared"` or `"workspace"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider resource ID.
    pub id: Option<String>,
    pub region: String,
    pub state: String,
    pub creation_time: Option<Timestamp>,
    pub size_gb: Option<u64>,
    pub volume_type: Option<String>,
    pub attached_to: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub mount_targets: Vec<String>,
    pub estimated_cost_gb: f64,
}

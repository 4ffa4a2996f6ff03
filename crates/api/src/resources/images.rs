//! Template and machine-image bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A workstation template as listed by the daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub complexity: String,
    /// Base image per region and architecture.
    #[serde(deserialize_with = "super::null_as_default")]
    pub ami: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub instance_type: BTreeMap<String, String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub ports: Vec<u16>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub estimated_cost_per_hour: BTreeMap<String, f64>,
}

/// Body of `POST /api/v1/ami/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmiCreationRequest {
    pub instance_id: String,
    pub template_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default, deserialize_with = "super::null_as_default")]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub public: bool,
    /// Account IDs to share the image with.
    #[serde(skip_serializing_if = "Vec::is_empty", default, deserialize_with = "super::null_as_default")]
    pub share_with: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default, deserialize_with = "super::null_as_default")]
    pub multi_region: Vec<String>,
    #[serde(default)]
    pub no_reboot: bool,
}

/// Response of `POST /api/v1/ami/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmiCreationResponse {
    pub creation_id: String,
    pub ami_name: String,
    pub status: String,
    pub message: Option<String>,
    pub estimated_completion_minutes: Option<u32>,
}

/// Response of `GET /api/v1/ami/status/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmiBuildStatus {
    pub creation_id: String,
    pub status: String,
    pub ami_id: Option<String>,
    /// Completion in percent, `0..=100`.
    pub progress: u8,
    pub error: Option<String>,
    pub estimated_cost: Option<f64>,
}

/// One entry of `GET /api/v1/ami/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmiSummary {
    pub ami_id: String,
    pub name: String,
    pub description: String,
    pub region: String,
    pub state: String,
    pub creation_date: Option<Timestamp>,
    pub public: bool,
    pub size_gb: Option<u64>,
}

/// Response of `GET /api/v1/ami/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmiList {
    #[serde(deserialize_with = "super::null_as_default")]
    pub amis: Vec<AmiSummary>,
    pub total_count: u64,
}

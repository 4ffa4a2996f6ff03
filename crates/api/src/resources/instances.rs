//! Workstation instance lifecycle bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Body of `POST /api/v1/instances`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Template to launch from.
    pub template: String,
    /// Name of the new instance.
    pub name: String,
    /// T-shirt size (`"S"`, `"M"`, `"L"`, ...) or an explicit instance type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Region override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Shared volumes to mount at launch.
    #[serde(skip_serializing_if = "Vec::is_empty", default, deserialize_with = "super::null_as_default")]
    pub volumes: Vec<String>,
    /// Block storage volumes to attach at launch.
    #[serde(skip_serializing_if = "Vec::is_empty", default, deserialize_with = "super::null_as_default")]
    pub ebs_volumes: Vec<String>,
    /// Request spot capacity.
    #[serde(default)]
    pub spot: bool,
    /// Validate without launching.
    #[serde(default)]
    pub dry_run: bool,
    /// Project to charge the instance to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Response of `POST /api/v1/instances`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchResponse {
    pub instance: Instance,
    pub message: String,
    pub estimated_cost: String,
}

/// Idle-detection state attached to an instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleDetection {
    pub enabled: bool,
    pub policy: String,
    /// Minutes the instance has been idle.
    pub idle_time: u32,
    /// Minutes of idleness before the policy acts.
    pub threshold: u32,
    pub action_schedule: Option<Timestamp>,
    pub action_pending: bool,
}

/// A workstation instance as reported by the daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub template: String,
    pub public_ip: String,
    pub private_ip: String,
    pub state: String,
    pub launch_time: Option<Timestamp>,
    pub estimated_daily_cost: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub attached_volumes: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub attached_ebs_volumes: Vec<String>,
    pub instance_type: String,
    /// `"spot"` or `"on-demand"`.
    pub instance_lifecycle: String,
    pub username: String,
    pub web_port: u16,
    pub has_web_interface: bool,
    pub project_id: Option<String>,
    pub idle_detection: Option<IdleDetection>,
}

/// Response of `GET /api/v1/instances`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceList {
    #[serde(deserialize_with = "super::null_as_default")]
    pub instances: Vec<Instance>,
    pub total_cost: f64,
}

/// Response of `GET /api/v1/instances/{name}/hibernation-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HibernationStatus {
    pub hibernation_supported: bool,
    pub is_hibernated: bool,
    pub instance_name: String,
}

/// Response of `GET /api/v1/instances/{name}/connect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInfo {
    /// Connection string (typically an `ssh` command line).
    pub connection_info: String,
}

/// Body of `POST /api/v1/instances/{name}/exec`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecRequest {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default, deserialize_with = "super::null_as_default")]
    pub environment: BTreeMap<String, String>,
    /// Seconds before the daemon aborts the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Response of `POST /api/v1/instances/{name}/exec`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecResult {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub status: String,
    /// Milliseconds the command ran for.
    pub execution_time: u64,
}

/// Body of `POST /api/v1/instances/{name}/resize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub instance_name: String,
    pub target_instance_type: String,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub wait: bool,
}

/// Response of `POST /api/v1/instances/{name}/resize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeResponse {
    pub success: bool,
    pub message: String,
    pub instance_name: String,
    pub current_type: String,
    pub target_type: String,
}

/// Query for `GET /api/v1/logs/{name}`; every field becomes a query
/// parameter when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogRequest {
    pub log_type: Option<String>,
    pub tail: Option<u32>,
    pub since: Option<String>,
    pub follow: bool,
}

impl LogRequest {
    /// Renders the set fields as `(name, value)` query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(log_type) = self.log_type.as_ref().filter(|v| !v.is_empty()) {
            pairs.push(("type", log_type.clone()));
        }
        if let Some(tail) = self.tail.filter(|tail| *tail > 0) {
            pairs.push(("tail", tail.to_string()));
        }
        if let Some(since) = self.since.as_ref().filter(|v| !v.is_empty()) {
            pairs.push(("since", since.clone()));
        }
        if self.follow {
            pairs.push(("follow", "true".to_string()));
        }
        pairs
    }
}

/// Response of `GET /api/v1/logs/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogResponse {
    pub instance_name: String,
    pub log_type: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_instance_response_decodes_with_defaults() {
        let instance: Instance = serde_json::from_str(r#"{"name": "a", "state": "running"}"#).unwrap();
        assert_eq!(instance.name, "a");
        assert!(instance.launch_time.is_none());
        assert!(instance.attached_volumes.is_empty());
    }

    #[test]
    fn launch_request_omits_unset_options() {
        let request = LaunchRequest {
            template: "python-ml".into(),
            name: "box".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("size").is_none());
        assert!(json.get("volumes").is_none());
        assert_eq!(json["template"], "python-ml");
    }

    #[test]
    fn log_request_only_emits_set_parameters() {
        let request = LogRequest {
            tail: Some(50),
            follow: true,
            ..Default::default()
        };
        assert_eq!(
            request.query_pairs(),
            vec![("tail", "50".to_string()), ("follow", "true".to_string())]
        );
        assert!(LogRequest::default().query_pairs().is_empty());
    }
}

//! Idle (hibernation) policy bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Broad category of an idle policy template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
    Aggressive,
    #[default]
    Balanced,
    Conservative,
    Development,
    Production,
    Research,
    Custom,
}

/// One schedule entry within a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySchedule {
    pub name: String,
    /// `"idle"`, `"daily"`, `"weekly"`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Action taken when the schedule fires: `"hibernate"` or `"stop"`.
    pub action: String,
    pub idle_minutes: u32,
    pub enabled: bool,
}

/// A pre-configured idle policy template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdlePolicy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: PolicyCategory,
    #[serde(deserialize_with = "super::null_as_default")]
    pub schedules: Vec<PolicySchedule>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub tags: BTreeMap<String, String>,
    pub estimated_savings_percent: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub suitable_for: Vec<String>,
    pub auto_apply: bool,
    pub priority: i32,
    /// IDs of templates this one cannot be combined with.
    #[serde(deserialize_with = "super::null_as_default")]
    pub conflicts: Vec<String>,
}

/// Response of `GET /api/v1/policies/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyStatus {
    pub enabled: bool,
    pub current_policy_set: Option<String>,
    pub last_updated: Option<String>,
    pub status: String,
    pub status_icon: String,
    pub message: Option<String>,
}

impl PolicyStatus {
    /// Policy sets currently assigned; empty when none is active.
    pub fn assigned_policies(&self) -> Vec<&str> {
        self.current_policy_set
            .as_deref()
            .filter(|set| !set.is_empty())
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_status_tolerates_missing_policy_set() {
        let status: PolicyStatus =
            serde_json::from_str(r#"{"enabled": true, "status": "active"}"#).unwrap();
        assert!(status.assigned_policies().is_empty());

        let status: PolicyStatus =
            serde_json::from_str(r#"{"enabled": true, "current_policy_set": "student"}"#).unwrap();
        assert_eq!(status.assigned_policies(), vec!["student"]);
    }
}

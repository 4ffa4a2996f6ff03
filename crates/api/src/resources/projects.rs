//! Project, membership and budget bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Archived,
}

/// Permission level of a project member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

/// A member of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMember {
    pub user_id: String,
    pub role: ProjectRole,
    pub added_at: Option<Timestamp>,
    pub added_by: String,
}

/// Budget configuration attached to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectBudget {
    /// Total budget in USD.
    pub total_budget: f64,
    /// Amount spent so far in USD.
    pub spent_amount: f64,
    pub monthly_limit: Option<f64>,
    pub daily_limit: Option<f64>,
}

/// A research project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub members: Vec<ProjectMember>,
    pub budget: Option<ProjectBudget>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub tags: BTreeMap<String, String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub status: ProjectStatus,
    /// Set by budget actions to block new launches.
    pub launch_prevented: bool,
}

/// Budget section of [`CreateProjectRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBudgetRequest {
    pub total_budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<f64>,
}

/// Body of `POST /api/v1/projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default, deserialize_with = "super::null_as_default")]
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<CreateBudgetRequest>,
}

/// Body of `PUT /api/v1/projects/{id}`; only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

/// Body of `POST /api/v1/projects/{id}/members`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
    pub role: ProjectRole,
    #[serde(default)]
    pub added_by: String,
}

/// Filter for `GET /api/v1/projects`; every set field becomes a query
/// parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub owner: Option<String>,
    pub status: Option<ProjectStatus>,
    pub has_budget: Option<bool>,
}

impl ProjectFilter {
    /// Renders the set fields as `(name, value)` query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(owner) = self.owner.as_ref().filter(|v| !v.is_empty()) {
            pairs.push(("owner", owner.clone()));
        }
        if let Some(status) = self.status {
            let rendered = match status {
                ProjectStatus::Active => "active",
                ProjectStatus::Paused => "paused",
                ProjectStatus::Completed => "completed",
                ProjectStatus::Archived => "archived",
            };
            pairs.push(("status", rendered.to_string()));
        }
        if let Some(has_budget) = self.has_budget {
            pairs.push(("has_budget", has_budget.to_string()));
        }
        pairs
    }
}

/// Response of `GET /api/v1/projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectList {
    #[serde(deserialize_with = "super::null_as_default")]
    pub projects: Vec<Project>,
    pub total_count: u64,
    pub filtered_count: u64,
}

/// Response of `GET /api/v1/projects/{id}/budget`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetStatus {
    pub project_id: String,
    pub budget_enabled: bool,
    pub total_budget: f64,
    pub spent_amount: f64,
    pub remaining_budget: f64,
    /// Fraction of the budget consumed, in `[0.0, 1.0]` unless overspent.
    pub spent_percentage: f64,
    pub projected_monthly_spend: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub active_alerts: Vec<String>,
}

//! Request and response bodies exchanged with the daemon.
//!
//! Response types derive `Default` and use `#[serde(default)]` so that a
//! loosely populated daemon response decodes into absent (`None`, empty)
//! fields instead of failing. The daemon writes unset lists and maps as
//! `null`; collection fields go through [`null_as_default`] so that decodes
//! to an empty collection as well. Request types skip absent optional fields when
//! serialised.

use serde::{Deserialize, Deserializer};

pub mod daemon;
pub mod images;
pub mod instances;
pub mod policies;
pub mod projects;
pub mod storage;

pub use daemon::DaemonStatus;
pub use images::{
    AmiBuildStatus, AmiCreationRequest, AmiCreationResponse, AmiList, AmiSummary, Template,
};
pub use instances::{
    ConnectionInfo, ExecRequest, ExecResult, HibernationStatus, IdleDetection, Instance,
    InstanceList, LaunchRequest, LaunchResponse, LogRequest, LogResponse, ResizeRequest,
    ResizeResponse,
};
pub use policies::{IdlePolicy, PolicyCategory, PolicySchedule, PolicyStatus};
pub use projects::{
    AddMemberRequest, BudgetStatus, CreateBudgetRequest, CreateProjectRequest, Project,
    ProjectBudget, ProjectFilter, ProjectList, ProjectMember, ProjectRole, ProjectStatus,
    UpdateProjectRequest,
};
pub use storage::{AttachRequest, StorageCreateRequest, StorageVolume, VolumeCreateRequest};

/// Decodes JSON `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_collections_decode_as_empty() {
        let instance: Instance = serde_json::from_str(
            r#"{"name": "box", "attached_volumes": null, "attached_ebs_volumes": null}"#,
        )
        .unwrap();
        assert_eq!(instance.name, "box");
        assert!(instance.attached_volumes.is_empty());
        assert!(instance.attached_ebs_volumes.is_empty());

        let project: Project =
            serde_json::from_str(r#"{"id": "p1", "members": null, "tags": null}"#).unwrap();
        assert!(project.members.is_empty());
        assert!(project.tags.is_empty());

        let list: InstanceList = serde_json::from_str(r#"{"instances": null}"#).unwrap();
        assert!(list.instances.is_empty());
    }

    #[test]
    fn present_collections_still_decode() {
        let template: Template =
            serde_json::from_str(r#"{"name": "python-ml", "ports": [22, 8888]}"#).unwrap();
        assert_eq!(template.ports, vec![22, 8888]);
    }
}

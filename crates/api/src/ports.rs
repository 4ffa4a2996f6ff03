//! Capability traits implemented by daemon clients.
//!
//! The daemon surface is split into cohesive capability groups so that an
//! implementation (or a test double) only has to provide the slice a caller
//! actually exercises. [`WorkstationApi`] composes all of them and is
//! implemented automatically for any type that implements every group.
//!
//! Every method takes a [`RequestContext`]; cancelling it, or letting its
//! deadline pass, aborts the call with [`ClientError::Cancelled`](crate::ClientError::Cancelled) or
//! [`ClientError::Timeout`](crate::ClientError::Timeout).
//!
//! Methods that address a resource by name reject an empty name with
//! [`ClientError::InvalidRequest`](crate::ClientError::InvalidRequest) before any network activity.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::resources::{
    AddMemberRequest, AmiBuildStatus, AmiCreationRequest, AmiCreationResponse, AmiList,
    BudgetStatus, CreateProjectRequest, DaemonStatus, ExecRequest, ExecResult, HibernationStatus,
    IdlePolicy, Instance, InstanceList, LaunchRequest, LaunchResponse, LogRequest, LogResponse,
    PolicyStatus, Project, ProjectFilter, ProjectList, ProjectMember, ResizeRequest,
    ResizeResponse, StorageCreateRequest, StorageVolume, Template, UpdateProjectRequest,
    VolumeCreateRequest,
};
use crate::{ClientConfig, RequestContext, Result};

/// Daemon health, lifecycle and version negotiation.
#[async_trait]
pub trait DaemonControl: Send + Sync {
    /// Replaces the identity/auth options sent with every later request.
    ///
    /// Requests already dispatched keep the headers they were built with.
    fn set_options(&self, config: ClientConfig);

    /// Succeeds if the daemon answers at all.
    async fn ping(&self, ctx: &RequestContext) -> Result<()>;

    /// Returns the daemon's status report.
    async fn status(&self, ctx: &RequestContext) -> Result<DaemonStatus>;

    /// Asks the daemon to shut down gracefully.
    async fn shutdown(&self, ctx: &RequestContext) -> Result<()>;

    /// Fetches the daemon version and checks it against `client_version`.
    ///
    /// Fails with [`ClientError::VersionIncompatible`](crate::ClientError::VersionIncompatible) when the major
    /// versions differ or the client's minor version is ahead of the
    /// daemon's; patch versions are ignored.
    async fn check_version_compatibility(
        &self,
        ctx: &RequestContext,
        client_version: &str,
    ) -> Result<()>;
}

/// Launching and operating workstation instances.
#[async_trait]
pub trait InstanceLifecycle: Send + Sync {
    async fn launch_instance(
        &self,
        ctx: &RequestContext,
        request: &LaunchRequest,
    ) -> Result<LaunchResponse>;

    /// Lists instances; `refresh` asks the daemon to re-query the cloud
    /// provider instead of answering from its cache.
    async fn list_instances(&self, ctx: &RequestContext, refresh: bool) -> Result<InstanceList>;

    async fn get_instance(&self, ctx: &RequestContext, name: &str) -> Result<Instance>;

    async fn delete_instance(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn start_instance(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn stop_instance(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn hibernate_instance(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn resume_instance(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn hibernation_status(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<HibernationStatus>;

    /// Returns the connection string for an instance.
    async fn connect_instance(&self, ctx: &RequestContext, name: &str) -> Result<String>;

    async fn exec_instance(
        &self,
        ctx: &RequestContext,
        name: &str,
        request: &ExecRequest,
    ) -> Result<ExecResult>;

    async fn resize_instance(
        &self,
        ctx: &RequestContext,
        request: &ResizeRequest,
    ) -> Result<ResizeResponse>;

    async fn instance_logs(
        &self,
        ctx: &RequestContext,
        name: &str,
        request: &LogRequest,
    ) -> Result<LogResponse>;
}

/// Shared volumes and block storage.
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn create_volume(
        &self,
        ctx: &RequestContext,
        request: &VolumeCreateRequest,
    ) -> Result<StorageVolume>;

    async fn list_volumes(&self, ctx: &RequestContext) -> Result<Vec<StorageVolume>>;

    async fn get_volume(&self, ctx: &RequestContext, name: &str) -> Result<StorageVolume>;

    async fn delete_volume(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn attach_volume(&self, ctx: &RequestContext, volume: &str, instance: &str)
        -> Result<()>;

    async fn detach_volume(&self, ctx: &RequestContext, volume: &str) -> Result<()>;

    async fn mount_volume(
        &self,
        ctx: &RequestContext,
        volume: &str,
        instance: &str,
        mount_point: &str,
    ) -> Result<()>;

    async fn unmount_volume(
        &self,
        ctx: &RequestContext,
        volume: &str,
        instance: &str,
    ) -> Result<()>;

    async fn create_storage(
        &self,
        ctx: &RequestContext,
        request: &StorageCreateRequest,
    ) -> Result<StorageVolume>;

    async fn list_storage(&self, ctx: &RequestContext) -> Result<Vec<StorageVolume>>;

    async fn get_storage(&self, ctx: &RequestContext, name: &str) -> Result<StorageVolume>;

    async fn delete_storage(&self, ctx: &RequestContext, name: &str) -> Result<()>;

    async fn attach_storage(
        &self,
        ctx: &RequestContext,
        storage: &str,
        instance: &str,
    ) -> Result<()>;

    async fn detach_storage(&self, ctx: &RequestContext, storage: &str) -> Result<()>;
}

/// Projects, membership and budgets.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn create_project(
        &self,
        ctx: &RequestContext,
        request: &CreateProjectRequest,
    ) -> Result<Project>;

    async fn list_projects(&self, ctx: &RequestContext, filter: &ProjectFilter)
        -> Result<ProjectList>;

    async fn get_project(&self, ctx: &RequestContext, project_id: &str) -> Result<Project>;

    async fn update_project(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project>;

    async fn delete_project(&self, ctx: &RequestContext, project_id: &str) -> Result<()>;

    async fn add_project_member(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        request: &AddMemberRequest,
    ) -> Result<()>;

    async fn remove_project_member(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        user_id: &str,
    ) -> Result<()>;

    async fn project_members(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<ProjectMember>>;

    async fn project_budget_status(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<BudgetStatus>;
}

/// Idle (hibernation) policies.
#[async_trait]
pub trait PoliciesApi: Send + Sync {
    async fn list_idle_policies(&self, ctx: &RequestContext) -> Result<Vec<IdlePolicy>>;

    async fn get_idle_policy(&self, ctx: &RequestContext, policy_id: &str) -> Result<IdlePolicy>;

    async fn apply_idle_policy(
        &self,
        ctx: &RequestContext,
        instance: &str,
        policy_id: &str,
    ) -> Result<()>;

    async fn remove_idle_policy(
        &self,
        ctx: &RequestContext,
        instance: &str,
        policy_id: &str,
    ) -> Result<()>;

    async fn instance_idle_policies(
        &self,
        ctx: &RequestContext,
        instance: &str,
    ) -> Result<Vec<IdlePolicy>>;

    async fn policy_status(&self, ctx: &RequestContext) -> Result<PolicyStatus>;
}

/// Templates and machine images.
#[async_trait]
pub trait ImagesApi: Send + Sync {
    async fn list_templates(&self, ctx: &RequestContext) -> Result<BTreeMap<String, Template>>;

    async fn get_template(&self, ctx: &RequestContext, name: &str) -> Result<Template>;

    /// Starts an image build; poll [`ImagesApi::ami_status`] with the
    /// returned creation ID.
    async fn create_ami(
        &self,
        ctx: &RequestContext,
        request: &AmiCreationRequest,
    ) -> Result<AmiCreationResponse>;

    async fn ami_status(&self, ctx: &RequestContext, creation_id: &str)
        -> Result<AmiBuildStatus>;

    async fn list_user_amis(&self, ctx: &RequestContext) -> Result<AmiList>;

    async fn delete_ami(&self, ctx: &RequestContext, ami_id: &str) -> Result<()>;
}

/// The complete daemon surface.
pub trait WorkstationApi:
    DaemonControl + InstanceLifecycle + StorageApi + ProjectsApi + PoliciesApi + ImagesApi
{
}

impl<T> WorkstationApi for T where
    T: DaemonControl + InstanceLifecycle + StorageApi + ProjectsApi + PoliciesApi + ImagesApi
{
}

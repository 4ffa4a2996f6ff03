use api::resources::{IdlePolicy, PolicyStatus};
use api::{InstanceName, PoliciesApi, PolicyId, RequestContext, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::{Endpoint, HttpClient};

const IDLE_POLICIES: &str = "/api/v1/idle/policies";
const INSTANCES: &str = "/api/v1/instances";
const POLICY_STATUS: &str = "/api/v1/policies/status";

/// Body of the idle policy `apply` and `remove` routes.
#[derive(Serialize)]
struct PolicyAssignment<'a> {
    instance_name: &'a str,
    policy_id: &'a str,
}

impl HttpClient {
    async fn assign_idle_policy(
        &self,
        ctx: &RequestContext,
        action: &'static str,
        instance: &str,
        policy_id: &str,
    ) -> Result<()> {
        let instance = InstanceName::parse(instance)?;
        let policy = PolicyId::parse(policy_id)?;
        let path = Endpoint::new(IDLE_POLICIES).literal(action).build();
        let body = PolicyAssignment {
            instance_name: instance.as_str(),
            policy_id: policy.as_str(),
        };
        self.send(ctx, Method::POST, &path, Some(&body)).await
    }
}

#[async_trait]
impl PoliciesApi for HttpClient {
    async fn list_idle_policies(&self, ctx: &RequestContext) -> Result<Vec<IdlePolicy>> {
        self.get(ctx, IDLE_POLICIES).await
    }

    async fn get_idle_policy(&self, ctx: &RequestContext, policy_id: &str) -> Result<IdlePolicy> {
        let id = PolicyId::parse(policy_id)?;
        let path = Endpoint::new(IDLE_POLICIES).segment(id.as_str()).build();
        self.get(ctx, &path).await
    }

    async fn apply_idle_policy(
        &self,
        ctx: &RequestContext,
        instance: &str,
        policy_id: &str,
    ) -> Result<()> {
        self.assign_idle_policy(ctx, "apply", instance, policy_id)
            .await
    }

    async fn remove_idle_policy(
        &self,
        ctx: &RequestContext,
        instance: &str,
        policy_id: &str,
    ) -> Result<()> {
        self.assign_idle_policy(ctx, "remove", instance, policy_id)
            .await
    }

    async fn instance_idle_policies(
        &self,
        ctx: &RequestContext,
        instance: &str,
    ) -> Result<Vec<IdlePolicy>> {
        let name = InstanceName::parse(instance)?;
        let path = Endpoint::new(INSTANCES)
            .segment(name.as_str())
            .literal("idle-policies")
            .build();
        self.get(ctx, &path).await
    }

    async fn policy_status(&self, ctx: &RequestContext) -> Result<PolicyStatus> {
        self.get(ctx, POLICY_STATUS).await
    }
}

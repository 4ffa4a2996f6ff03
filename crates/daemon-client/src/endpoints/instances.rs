use api::resources::{
    ConnectionInfo, ExecRequest, ExecResult, HibernationStatus, Instance, InstanceList,
    LaunchRequest, LaunchResponse, LogRequest, LogResponse, ResizeRequest, ResizeResponse,
};
use api::{ClientError, InstanceLifecycle, InstanceName, RequestContext, Result, TemplateName};
use async_trait::async_trait;
use reqwest::Method;

use crate::{Endpoint, HttpClient};

const INSTANCES: &str = "/api/v1/instances";
const LOGS: &str = "/api/v1/logs";

fn instance(name: &str) -> Result<Endpoint> {
    let name = InstanceName::parse(name)?;
    Ok(Endpoint::new(INSTANCES).segment(name.as_str()))
}

impl HttpClient {
    async fn instance_action(
        &self,
        ctx: &RequestContext,
        name: &str,
        action: &'static str,
    ) -> Result<()> {
        let path = instance(name)?.literal(action).build();
        self.send::<()>(ctx, Method::POST, &path, None).await
    }
}

#[async_trait]
impl InstanceLifecycle for HttpClient {
    async fn launch_instance(
        &self,
        ctx: &RequestContext,
        request: &LaunchRequest,
    ) -> Result<LaunchResponse> {
        TemplateName::parse(request.template.as_str())?;
        InstanceName::parse(request.name.as_str())?;
        self.call(ctx, Method::POST, INSTANCES, Some(request)).await
    }

    async fn list_instances(&self, ctx: &RequestContext, refresh: bool) -> Result<InstanceList> {
        let mut endpoint = Endpoint::new(INSTANCES);
        if refresh {
            endpoint = endpoint.query("refresh", "true");
        }
        self.get(ctx, &endpoint.build()).await
    }

    async fn get_instance(&self, ctx: &RequestContext, name: &str) -> Result<Instance> {
        self.get(ctx, &instance(name)?.build()).await
    }

    async fn delete_instance(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        let path = instance(name)?.build();
        self.send::<()>(ctx, Method::DELETE, &path, None).await
    }

    async fn start_instance(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        self.instance_action(ctx, name, "start").await
    }

    async fn stop_instance(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        self.instance_action(ctx, name, "stop").await
    }

    async fn hibernate_instance(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        self.instance_action(ctx, name, "hibernate").await
    }

    async fn resume_instance(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        self.instance_action(ctx, name, "resume").await
    }

    async fn hibernation_status(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<HibernationStatus> {
        let path = instance(name)?.literal("hibernation-status").build();
        self.get(ctx, &path).await
    }

    async fn connect_instance(&self, ctx: &RequestContext, name: &str) -> Result<String> {
        let path = instance(name)?.literal("connect").build();
        let info: ConnectionInfo = self.get(ctx, &path).await?;
        Ok(info.connection_info)
    }

    async fn exec_instance(
        &self,
        ctx: &RequestContext,
        name: &str,
        request: &ExecRequest,
    ) -> Result<ExecResult> {
        if request.command.trim().is_empty() {
            return Err(ClientError::invalid("command must not be empty"));
        }
        let path = instance(name)?.literal("exec").build();
        self.call(ctx, Method::POST, &path, Some(request)).await
    }

    async fn resize_instance(
        &self,
        ctx: &RequestContext,
        request: &ResizeRequest,
    ) -> Result<ResizeResponse> {
        if request.target_instance_type.is_empty() {
            return Err(ClientError::invalid("target instance type must not be empty"));
        }
        let path = instance(&request.instance_name)?.literal("resize").build();
        self.call(ctx, Method::POST, &path, Some(request)).await
    }

    async fn instance_logs(
        &self,
        ctx: &RequestContext,
        name: &str,
        request: &LogRequest,
    ) -> Result<LogResponse> {
        let name = InstanceName::parse(name)?;
        let path = Endpoint::new(LOGS)
            .segment(name.as_str())
            .query_pairs(request.query_pairs())
            .build();
        self.get(ctx, &path).await
    }
}

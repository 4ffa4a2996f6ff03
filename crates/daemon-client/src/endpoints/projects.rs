use api::resources::{
    AddMemberRequest, BudgetStatus, CreateProjectRequest, Project, ProjectFilter, ProjectList,
    ProjectMember, UpdateProjectRequest,
};
use api::{ClientError, ProjectId, ProjectsApi, RequestContext, Result, UserId};
use async_trait::async_trait;
use reqwest::Method;

use crate::{Endpoint, HttpClient};

const PROJECTS: &str = "/api/v1/projects";

fn project(project_id: &str) -> Result<Endpoint> {
    let id = ProjectId::parse(project_id)?;
    Ok(Endpoint::new(PROJECTS).segment(id.as_str()))
}

#[async_trait]
impl ProjectsApi for HttpClient {
    async fn create_project(
        &self,
        ctx: &RequestContext,
        request: &CreateProjectRequest,
    ) -> Result<Project> {
        if request.name.trim().is_empty() {
            return Err(ClientError::invalid("project name must not be empty"));
        }
        self.call(ctx, Method::POST, PROJECTS, Some(request)).await
    }

    async fn list_projects(
        &self,
        ctx: &RequestContext,
        filter: &ProjectFilter,
    ) -> Result<ProjectList> {
        let path = Endpoint::new(PROJECTS)
            .query_pairs(filter.query_pairs())
            .build();
        self.get(ctx, &path).await
    }

    async fn get_project(&self, ctx: &RequestContext, project_id: &str) -> Result<Project> {
        self.get(ctx, &project(project_id)?.build()).await
    }

    async fn update_project(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project> {
        let path = project(project_id)?.build();
        self.call(ctx, Method::PUT, &path, Some(request)).await
    }

    async fn delete_project(&self, ctx: &RequestContext, project_id: &str) -> Result<()> {
        let path = project(project_id)?.build();
        self.send::<()>(ctx, Method::DELETE, &path, None).await
    }

    async fn add_project_member(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        request: &AddMemberRequest,
    ) -> Result<()> {
        UserId::parse(request.user_id.as_str())?;
        let path = project(project_id)?.literal("members").build();
        self.send(ctx, Method::POST, &path, Some(request)).await
    }

    async fn remove_project_member(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let user = UserId::parse(user_id)?;
        let path = project(project_id)?
            .literal("members")
            .segment(user.as_str())
            .build();
        self.send::<()>(ctx, Method::DELETE, &path, None).await
    }

    async fn project_members(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<ProjectMember>> {
        let path = project(project_id)?.literal("members").build();
        self.get(ctx, &path).await
    }

    async fn project_budget_status(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<BudgetStatus> {
        let path = project(project_id)?.literal("budget").build();
        self.get(ctx, &path).await
    }
}

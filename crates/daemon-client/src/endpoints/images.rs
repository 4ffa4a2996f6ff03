use std::collections::BTreeMap;

use api::resources::{AmiBuildStatus, AmiCreationRequest, AmiCreationResponse, AmiList, Template};
use api::{AmiCreationId, ClientError, ImagesApi, RequestContext, Result, TemplateName};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::{Endpoint, HttpClient};

const TEMPLATES: &str = "/api/v1/templates";
const AMI: &str = "/api/v1/ami";

#[derive(Serialize)]
struct DeleteAmiRequest<'a> {
    ami_id: &'a str,
}

#[async_trait]
impl ImagesApi for HttpClient {
    async fn list_templates(&self, ctx: &RequestContext) -> Result<BTreeMap<String, Template>> {
        self.get(ctx, TEMPLATES).await
    }

    async fn get_template(&self, ctx: &RequestContext, name: &str) -> Result<Template> {
        let name = TemplateName::parse(name)?;
        let path = Endpoint::new(TEMPLATES).segment(name.as_str()).build();
        self.get(ctx, &path).await
    }

    async fn create_ami(
        &self,
        ctx: &RequestContext,
        request: &AmiCreationRequest,
    ) -> Result<AmiCreationResponse> {
        if request.instance_id.is_empty() || request.name.is_empty() {
            return Err(ClientError::invalid(
                "image creation needs a source instance and an image name",
            ));
        }
        let path = Endpoint::new(AMI).literal("create").build();
        self.call(ctx, Method::POST, &path, Some(request)).await
    }

    async fn ami_status(
        &self,
        ctx: &RequestContext,
        creation_id: &str,
    ) -> Result<AmiBuildStatus> {
        let id = AmiCreationId::parse(creation_id)?;
        let path = Endpoint::new(AMI)
            .literal("status")
            .segment(id.as_str())
            .build();
        self.get(ctx, &path).await
    }

    async fn list_user_amis(&self, ctx: &RequestContext) -> Result<AmiList> {
        let path = Endpoint::new(AMI).literal("list").build();
        self.get(ctx, &path).await
    }

    async fn delete_ami(&self, ctx: &RequestContext, ami_id: &str) -> Result<()> {
        if ami_id.is_empty() {
            return Err(ClientError::invalid("AMI ID must not be empty"));
        }
        let path = Endpoint::new(AMI).literal("delete").build();
        let body = DeleteAmiRequest { ami_id };
        self.send(ctx, Method::POST, &path, Some(&body)).await
    }
}

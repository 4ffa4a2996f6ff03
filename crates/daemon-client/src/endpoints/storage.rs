use api::resources::{AttachRequest, StorageCreateRequest, StorageVolume, VolumeCreateRequest};
use api::{ClientError, InstanceName, RequestContext, Result, StorageApi, StorageName, VolumeName};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::{Endpoint, HttpClient};

const VOLUMES: &str = "/api/v1/volumes";
const STORAGE: &str = "/api/v1/storage";

fn volume(name: &str) -> Result<Endpoint> {
    let name = VolumeName::parse(name)?;
    Ok(Endpoint::new(VOLUMES).segment(name.as_str()))
}

fn storage(name: &str) -> Result<Endpoint> {
    let name = StorageName::parse(name)?;
    Ok(Endpoint::new(STORAGE).segment(name.as_str()))
}

fn attach_body(instance: &str, mount_point: Option<&str>) -> Result<AttachRequest> {
    let instance = InstanceName::parse(instance)?;
    Ok(AttachRequest {
        instance: instance.as_str().to_string(),
        mount_point: mount_point.map(str::to_string),
    })
}

/// Body of the volume `unmount` route.
#[derive(Serialize)]
struct UnmountRequest<'a> {
    instance: &'a str,
}

#[async_trait]
impl StorageApi for HttpClient {
    async fn create_volume(
        &self,
        ctx: &RequestContext,
        request: &VolumeCreateRequest,
    ) -> Result<StorageVolume> {
        VolumeName::parse(request.name.as_str())?;
        self.call(ctx, Method::POST, VOLUMES, Some(request)).await
    }

    async fn list_volumes(&self, ctx: &RequestContext) -> Result<Vec<StorageVolume>> {
        self.get(ctx, VOLUMES).await
    }

    async fn get_volume(&self, ctx: &RequestContext, name: &str) -> Result<StorageVolume> {
        self.get(ctx, &volume(name)?.build()).await
    }

    async fn delete_volume(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        let path = volume(name)?.build();
        self.send::<()>(ctx, Method::DELETE, &path, None).await
    }

    async fn attach_volume(
        &self,
        ctx: &RequestContext,
        volume_name: &str,
        instance: &str,
    ) -> Result<()> {
        let path = volume(volume_name)?.literal("attach").build();
        let body = attach_body(instance, None)?;
        self.send(ctx, Method::POST, &path, Some(&body)).await
    }

    async fn detach_volume(&self, ctx: &RequestContext, volume_name: &str) -> Result<()> {
        let path = volume(volume_name)?.literal("detach").build();
        self.send::<()>(ctx, Method::POST, &path, None).await
    }

    async fn mount_volume(
        &self,
        ctx: &RequestContext,
        volume_name: &str,
        instance: &str,
        mount_point: &str,
    ) -> Result<()> {
        if mount_point.is_empty() {
            return Err(ClientError::invalid("mount point must not be empty"));
        }
        let path = volume(volume_name)?.literal("mount").build();
        let body = attach_body(instance, Some(mount_point))?;
        self.send(ctx, Method::POST, &path, Some(&body)).await
    }

    async fn unmount_volume(
        &self,
        ctx: &RequestContext,
        volume_name: &str,
        instance: &str,
    ) -> Result<()> {
        let path = volume(volume_name)?.literal("unmount").build();
        let instance = InstanceName::parse(instance)?;
        let body = UnmountRequest {
            instance: instance.as_str(),
        };
        self.send(ctx, Method::POST, &path, Some(&body)).await
    }

    async fn create_storage(
        &self,
        ctx: &RequestContext,
        request: &StorageCreateRequest,
    ) -> Result<StorageVolume> {
        StorageName::parse(request.name.as_str())?;
        self.call(ctx, Method::POST, STORAGE, Some(request)).await
    }

    async fn list_storage(&self, ctx: &RequestContext) -> Result<Vec<StorageVolume>> {
        self.get(ctx, STORAGE).await
    }

    async fn get_storage(&self, ctx: &RequestContext, name: &str) -> Result<StorageVolume> {
        self.get(ctx, &storage(name)?.build()).await
    }

    async fn delete_storage(&self, ctx: &RequestContext, name: &str) -> Result<()> {
        let path = storage(name)?.build();
        self.send::<()>(ctx, Method::DELETE, &path, None).await
    }

    async fn attach_storage(
        &self,
        ctx: &RequestContext,
        storage_name: &str,
        instance: &str,
    ) -> Result<()> {
        let path = storage(storage_name)?.literal("attach").build();
        let body = attach_body(instance, None)?;
        self.send(ctx, Method::POST, &path, Some(&body)).await
    }

    async fn detach_storage(&self, ctx: &RequestContext, storage_name: &str) -> Result<()> {
        let path = storage(storage_name)?.literal("detach").build();
        self.send::<()>(ctx, Method::POST, &path, None).await
    }
}

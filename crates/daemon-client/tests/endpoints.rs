//! Routes and bodies of the typed capability wrappers.

use std::sync::Arc;

use api::resources::{
    AddMemberRequest, ExecRequest, LogRequest, ProjectFilter, ProjectRole, ProjectStatus,
    ResizeRequest, VolumeCreateRequest,
};
use api::{
    ClientError, DaemonControl, ImagesApi, InstanceLifecycle, PoliciesApi, ProjectsApi,
    RequestContext, StorageApi, WorkstationApi,
};
use daemon_client::HttpClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ctx() -> RequestContext {
    RequestContext::background()
}

// ============================================================================
// Daemon control
// ============================================================================

#[tokio::test]
async fn status_decodes_sparse_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "0.4.2",
            "status": "running",
            "active_ops": 3,
            "aws_region": "us-west-2"
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let status = client.status(&ctx()).await.unwrap();
    assert_eq!(status.version.as_deref(), Some("0.4.2"));
    assert_eq!(status.active_ops, 3);
    assert_eq!(status.total_requests, 0);
}

#[tokio::test]
async fn shutdown_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/shutdown"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    HttpClient::new(&server.uri())
        .unwrap()
        .shutdown(&ctx())
        .await
        .unwrap();
}

// ============================================================================
// Instances
// ============================================================================

#[tokio::test]
async fn refresh_flag_becomes_a_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/instances"))
        .and(query_param("refresh", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [{"name": "a", "state": "running"}],
            "total_cost": 1.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = HttpClient::new(&server.uri())
        .unwrap()
        .list_instances(&ctx(), true)
        .await
        .unwrap();
    assert_eq!(list.instances.len(), 1);
    assert_eq!(list.total_cost, 1.5);
}

#[tokio::test]
async fn null_collections_decode_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [{
                "id": "i-0abc",
                "name": "box",
                "state": "stopped",
                "attached_volumes": null,
                "attached_ebs_volumes": null,
                "launch_time": "2024-05-01T12:00:00Z"
            }],
            "total_cost": 0.0
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "name": "thesis",
            "members": null,
            "tags": null,
            "budget": null
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let list = client.list_instances(&ctx(), false).await.unwrap();
    assert_eq!(list.instances.len(), 1);
    assert_eq!(list.instances[0].name, "box");
    assert!(list.instances[0].attached_volumes.is_empty());
    assert!(list.instances[0].attached_ebs_volumes.is_empty());

    let project = client.get_project(&ctx(), "p1").await.unwrap();
    assert_eq!(project.name, "thesis");
    assert!(project.members.is_empty());
    assert!(project.tags.is_empty());
    assert!(project.budget.is_none());
}

#[tokio::test]
async fn lifecycle_actions_post_to_their_routes() {
    let server = MockServer::start().await;
    for action in ["start", "stop", "hibernate", "resume"] {
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/instances/box/{action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = HttpClient::new(&server.uri()).unwrap();
    client.start_instance(&ctx(), "box").await.unwrap();
    client.stop_instance(&ctx(), "box").await.unwrap();
    client.hibernate_instance(&ctx(), "box").await.unwrap();
    client.resume_instance(&ctx(), "box").await.unwrap();
}

#[tokio::test]
async fn connect_returns_the_connection_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/instances/box/connect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"connection_info": "ssh ubuntu@10.0.0.5"})),
        )
        .mount(&server)
        .await;

    let info = HttpClient::new(&server.uri())
        .unwrap()
        .connect_instance(&ctx(), "box")
        .await
        .unwrap();
    assert_eq!(info, "ssh ubuntu@10.0.0.5");
}

#[tokio::test]
async fn exec_and_resize_send_their_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/instances/box/exec"))
        .and(body_json(json!({"command": "nvidia-smi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "command": "nvidia-smi",
            "exit_code": 0,
            "stdout": "ok",
            "status": "completed"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/instances/box/resize"))
        .and(body_json(json!({
            "instance_name": "box",
            "target_instance_type": "m5.xlarge",
            "force": false,
            "wait": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "target_type": "m5.xlarge"
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let exec = client
        .exec_instance(
            &ctx(),
            "box",
            &ExecRequest {
                command: "nvidia-smi".to_string(),
                ..ExecRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(exec.exit_code, 0);
    assert_eq!(exec.stdout, "ok");

    let resize = client
        .resize_instance(
            &ctx(),
            &ResizeRequest {
                instance_name: "box".to_string(),
                target_instance_type: "m5.xlarge".to_string(),
                force: false,
                wait: true,
            },
        )
        .await
        .unwrap();
    assert!(resize.success);
}

#[tokio::test]
async fn logs_forward_query_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs/box"))
        .and(query_param("type", "cloud-init"))
        .and(query_param("tail", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instance_name": "box",
            "log_type": "cloud-init",
            "lines": ["a", "b"]
        })))
        .mount(&server)
        .await;

    let logs = HttpClient::new(&server.uri())
        .unwrap()
        .instance_logs(
            &ctx(),
            "box",
            &LogRequest {
                log_type: Some("cloud-init".to_string()),
                tail: Some(20),
                ..LogRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(logs.lines, vec!["a", "b"]);
}

// ============================================================================
// Storage
// ============================================================================

#[tokio::test]
async fn volume_routes_and_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/volumes"))
        .and(body_json(json!({"name": "shared"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "shared",
            "type": "shared",
            "state": "available"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/volumes/shared/attach"))
        .and(body_json(json!({"instance": "box"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/volumes/shared/mount"))
        .and(body_json(json!({"instance": "box", "mount_point": "/data"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let volume = client
        .create_volume(
            &ctx(),
            &VolumeCreateRequest {
                name: "shared".to_string(),
                ..VolumeCreateRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(volume.kind, "shared");

    client.attach_volume(&ctx(), "shared", "box").await.unwrap();
    client
        .mount_volume(&ctx(), "shared", "box", "/data")
        .await
        .unwrap();

    let err = client.attach_volume(&ctx(), "shared", "").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest { .. }));
}

#[tokio::test]
async fn storage_detach_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/storage/scratch/detach"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    HttpClient::new(&server.uri())
        .unwrap()
        .detach_storage(&ctx(), "scratch")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests[0].body.is_empty());
}

// ============================================================================
// Projects, policies, images
// ============================================================================

#[tokio::test]
async fn project_filter_and_membership() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("owner", "alice"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"id": "p1", "name": "genomics", "status": "active"}],
            "total_count": 4,
            "filtered_count": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/p1/members"))
        .and(body_json(json!({"user_id": "bob", "role": "viewer", "added_by": "alice"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/projects/p1/members/bob"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let list = client
        .list_projects(
            &ctx(),
            &ProjectFilter {
                owner: Some("alice".to_string()),
                status: Some(ProjectStatus::Active),
                has_budget: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(list.filtered_count, 1);
    assert_eq!(list.projects[0].name, "genomics");

    client
        .add_project_member(
            &ctx(),
            "p1",
            &AddMemberRequest {
                user_id: "bob".to_string(),
                role: ProjectRole::Viewer,
                added_by: "alice".to_string(),
            },
        )
        .await
        .unwrap();
    client
        .remove_project_member(&ctx(), "p1", "bob")
        .await
        .unwrap();
}

#[tokio::test]
async fn idle_policy_assignment_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/idle/policies/apply"))
        .and(body_json(json!({"instance_name": "box", "policy_id": "balanced"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    HttpClient::new(&server.uri())
        .unwrap()
        .apply_idle_policy(&ctx(), "box", "balanced")
        .await
        .unwrap();
}

#[tokio::test]
async fn templates_decode_as_a_map_through_the_umbrella_trait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "python-ml": {"name": "Python ML", "slug": "python-ml", "ports": [22, 8888]},
            "r-research": {"name": "R Research"}
        })))
        .mount(&server)
        .await;

    let daemon: Arc<dyn WorkstationApi> = Arc::new(HttpClient::new(&server.uri()).unwrap());
    let templates = daemon.list_templates(&ctx()).await.unwrap();

    assert_eq!(templates.len(), 2);
    assert_eq!(templates["python-ml"].ports, vec![22, 8888]);
    assert!(daemon.get_template(&ctx(), "").await.is_err());
}

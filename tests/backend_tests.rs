//! Contract tests: callers depend only on the `Backend` trait, so a
//! hand-rolled double standing in for the control-plane adapter must be able
//! to drive the same flows.

use std::sync::Mutex;

use async_trait::async_trait;
use tether::{Backend, BackendError, Container, DeployOptions, Result};

/// Test double that records every call and answers from canned data.
struct RecordingBackend {
    calls: Mutex<Vec<String>>,
    containers: Vec<Container>,
}

impl RecordingBackend {
    fn new(containers: Vec<Container>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            containers,
        }
    }

    fn note(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn validate(&self) -> Result<()> {
        self.note("validate");
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<Container>> {
        self.note("list");
        Ok(self.containers.clone())
    }

    async fn deploy_container(&self, opts: DeployOptions) -> Result<Container> {
        self.note(format!("deploy {}", opts.image));
        Ok(Container {
            id: "0123456789ab".to_string(),
            name: opts.name.unwrap_or_default(),
            image: opts.image,
            state: "running".to_string(),
            status: String::new(),
        })
    }

    async fn remove_container(&self, container: &str, force: bool) -> Result<()> {
        self.note(format!("remove {container} force={force}"));
        Ok(())
    }

    async fn stop_container(&self, container: &str) -> Result<()> {
        self.note(format!("stop {container}"));
        Ok(())
    }

    async fn start_container(&self, container: &str) -> Result<()> {
        self.note(format!("start {container}"));
        Ok(())
    }

    async fn deploy_compose_stack(&self, name: &str, compose_content: &str) -> Result<i64> {
        if name.trim().is_empty() || compose_content.trim().is_empty() {
            return Err(BackendError::validation("stack name and content are required"));
        }
        self.note(format!("compose {name}"));
        Ok(7)
    }
}

#[tokio::test]
async fn a_double_can_stand_in_for_the_adapter() {
    let double = RecordingBackend::new(vec![]);
    let backend: &dyn Backend = &double;

    backend.validate().await.unwrap();
    assert!(backend.list_containers().await.unwrap().is_empty());
    assert_eq!(double.calls(), vec!["validate", "list"]);
}

#[tokio::test]
async fn lifecycle_flows_run_through_the_contract() {
    let double = RecordingBackend::new(vec![]);
    let backend: &dyn Backend = &double;

    let deployed = backend
        .deploy_container(DeployOptions {
            name: Some("web".to_string()),
            image: "nginx:latest".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(deployed.state, "running");

    backend.stop_container(&deployed.name).await.unwrap();
    backend.start_container(&deployed.name).await.unwrap();
    backend.remove_container(&deployed.name, true).await.unwrap();

    assert_eq!(
        double.calls(),
        vec![
            "deploy nginx:latest",
            "stop web",
            "start web",
            "remove web force=true",
        ]
    );
}

#[tokio::test]
async fn compose_validation_applies_to_any_implementer() {
    let double = RecordingBackend::new(vec![]);
    let backend: &dyn Backend = &double;

    let err = backend.deploy_compose_stack("", "services: {}").await.unwrap_err();
    assert!(err.is_validation());
    assert!(double.calls().is_empty());

    let stack_id = backend
        .deploy_compose_stack("edge", "services: {}")
        .await
        .unwrap();
    assert_eq!(stack_id, 7);
}

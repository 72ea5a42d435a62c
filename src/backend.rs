use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Container, DeployOptions};

/// Capability contract for remote container backends (Portainer today,
/// other control planes later). Exactly one production implementer exists;
/// tests substitute doubles behind the same trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Checks that the session's credentials are accepted by the remote.
    async fn validate(&self) -> Result<()>;

    /// Returns all containers on the remote host, running and stopped,
    /// in the order the control plane reports them.
    async fn list_containers(&self) -> Result<Vec<Container>>;

    /// Creates and starts a new container. When creation succeeds but the
    /// start call fails, the container is left behind in the created state
    /// and the error surfaces to the caller; no cleanup is attempted.
    async fn deploy_container(&self, opts: DeployOptions) -> Result<Container>;

    /// Removes a container by ID or name. `force` permits removing a
    /// running container.
    async fn remove_container(&self, container: &str, force: bool) -> Result<()>;

    /// Stops a running container by ID or name.
    async fn stop_container(&self, container: &str) -> Result<()>;

    /// Starts a stopped container by ID or name.
    async fn start_container(&self, container: &str) -> Result<()>;

    /// Deploys a multi-service stack from inline compose-file content and
    /// returns the stack identifier assigned by the control plane.
    async fn deploy_compose_stack(&self, name: &str, compose_content: &str) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    #[tokio::test]
    async fn backend_is_object_safe() {
        let mut mock = MockBackend::new();
        mock.expect_validate().returning(|| Ok(()));
        mock.expect_list_containers().returning(|| Ok(vec![]));

        let backend: Box<dyn Backend> = Box::new(mock);
        backend.validate().await.unwrap();
        assert!(backend.list_containers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn errors_propagate_through_the_contract() {
        let mut mock = MockBackend::new();
        mock.expect_stop_container()
            .returning(|_| Err(BackendError::Protocol { status: 500, body: "boom".into() }));

        let backend: Box<dyn Backend> = Box::new(mock);
        let err = backend.stop_container("web").await.unwrap_err();
        assert!(matches!(err, BackendError::Protocol { status: 500, .. }));
    }
}

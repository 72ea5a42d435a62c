use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{BackendError, Result};
use crate::types::{Container, DeployOptions};

use super::types::{
    CreateContainerRequest, CreatedContainer, EndpointRecord, RawContainer, StackCreateRequest,
    StackRecord, short_id,
};

/// Per-request timeout for control-plane calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a Portainer-compatible control plane.
///
/// Holds an immutable session (base URL plus bearer token), so a single
/// instance is safe to share across concurrent calls. Every operation issues
/// exactly one HTTP request per underlying API call and never retries;
/// callers own any retry policy. Dropping an operation future aborts the
/// in-flight request.
pub struct PortainerClient {
    client: Client,
    base_url: String,
    jwt: String,
}

impl PortainerClient {
    pub fn new(base_url: &str, jwt: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BackendError::Connection)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt: jwt.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: impl AsRef<str>) -> String {
        format!("{}{}", self.base_url, path.as_ref())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .header("Authorization", format!("Bearer {}", self.jwt))
            .send()
            .await
            .map_err(BackendError::Connection)
    }

    /// Resolves the single managed Docker environment: the first entry in
    /// the control plane's endpoint listing. Resolved fresh on every call;
    /// nothing is cached between operations.
    async fn first_endpoint(&self) -> Result<i64> {
        let response = self.send(self.client.get(self.url("/api/endpoints"))).await?;
        let response = check_response(response, &[StatusCode::OK]).await?;
        let endpoints: Vec<EndpointRecord> = decode(response, "endpoints").await?;
        select_endpoint(&endpoints)
    }

    async fn create_container(
        &self,
        endpoint: i64,
        opts: &DeployOptions,
    ) -> Result<CreatedContainer> {
        let mut url = self.url(format!("/api/endpoints/{endpoint}/docker/containers/create"));
        if let Some(name) = opts.name.as_deref().filter(|name| !name.is_empty()) {
            url.push_str("?name=");
            url.push_str(name);
        }

        debug!("creating container from image {}", opts.image);
        let payload = CreateContainerRequest::from_options(opts);

        let response = self.send(self.client.post(&url).json(&payload)).await?;
        let response =
            check_response(response, &[StatusCode::CREATED, StatusCode::OK]).await?;
        let created: CreatedContainer = decode(response, "container create").await?;

        for warning in &created.warnings {
            warn!("control plane warning: {}", warning);
        }

        Ok(created)
    }

    async fn start_by_id(&self, endpoint: i64, container: &str) -> Result<()> {
        let url =
            self.url(format!("/api/endpoints/{endpoint}/docker/containers/{container}/start"));
        let response = self.send(self.client.post(&url)).await?;
        check_response(response, &[StatusCode::NO_CONTENT, StatusCode::NOT_MODIFIED]).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for PortainerClient {
    async fn validate(&self) -> Result<()> {
        let response = self.send(self.client.get(self.url("/api/status"))).await?;
        classify_session(response).await
    }

    async fn list_containers(&self) -> Result<Vec<Container>> {
        let endpoint = self.first_endpoint().await?;
        let url =
            self.url(format!("/api/endpoints/{endpoint}/docker/containers/json?all=true"));

        let response = self.send(self.client.get(&url)).await?;
        let response = check_response(response, &[StatusCode::OK]).await?;
        parse_containers(response).await
    }

    async fn deploy_container(&self, opts: DeployOptions) -> Result<Container> {
        let endpoint = self.first_endpoint().await?;
        let created = self.create_container(endpoint, &opts).await?;

        // No rollback: if this start call fails, the container stays behind
        // in the created state and the error surfaces to the caller as-is.
        self.start_by_id(endpoint, &created.id).await?;

        Ok(Container {
            id: short_id(&created.id),
            name: opts.name.unwrap_or_default(),
            image: opts.image,
            state: "running".to_string(),
            status: String::new(),
        })
    }

    async fn remove_container(&self, container: &str, force: bool) -> Result<()> {
        let endpoint = self.first_endpoint().await?;
        let url = self.url(format!(
            "/api/endpoints/{endpoint}/docker/containers/{container}?force={force}"
        ));

        let response = self.send(self.client.delete(&url)).await?;
        check_response(response, &[StatusCode::NO_CONTENT, StatusCode::OK]).await?;
        Ok(())
    }

    async fn stop_container(&self, container: &str) -> Result<()> {
        let endpoint = self.first_endpoint().await?;
        let url =
            self.url(format!("/api/endpoints/{endpoint}/docker/containers/{container}/stop"));

        let response = self.send(self.client.post(&url)).await?;
        check_response(response, &[StatusCode::NO_CONTENT, StatusCode::NOT_MODIFIED]).await?;
        Ok(())
    }

    async fn start_container(&self, container: &str) -> Result<()> {
        let endpoint = self.first_endpoint().await?;
        self.start_by_id(endpoint, container).await
    }

    async fn deploy_compose_stack(&self, name: &str, compose_content: &str) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(BackendError::validation("stack name cannot be empty"));
        }
        if compose_content.trim().is_empty() {
            return Err(BackendError::validation("compose content cannot be empty"));
        }

        let endpoint = self.first_endpoint().await?;
        let url = self.url(format!("/api/stacks?type=2&method=string&endpointId={endpoint}"));
        let payload = StackCreateRequest::new(name, compose_content);

        let response = self.send(self.client.post(&url).json(&payload)).await?;
        let response =
            check_response(response, &[StatusCode::CREATED, StatusCode::OK]).await?;
        let stack: StackRecord = decode(response, "stack create").await?;
        Ok(stack.id)
    }
}

/// Exchanges operator credentials for a bearer token. Runs without a session,
/// so it lives outside [`PortainerClient`]; used only by the login flow.
pub async fn authenticate(base_url: &str, username: &str, password: &str) -> Result<String> {
    let url = format!("{}/api/auth", base_url.trim_end_matches('/'));
    let payload = super::types::AuthRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(BackendError::Connection)?;

    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .map_err(BackendError::Connection)?;

    parse_auth_response(response).await
}

/// Validates a response against the operation's accepted status codes;
/// anything else becomes a protocol error carrying status and body. The body
/// read is best-effort: a failure while reading yields an empty body.
async fn check_response(response: Response, expected: &[StatusCode]) -> Result<Response> {
    if expected.contains(&response.status()) {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Protocol {
        status: status.as_u16(),
        body,
    })
}

/// Session check classification: 401 means the token itself was rejected;
/// everything else goes through the generic classifier.
async fn classify_session(response: Response) -> Result<()> {
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(BackendError::Auth);
    }
    check_response(response, &[StatusCode::OK]).await?;
    Ok(())
}

/// Login classification: 401 and 422 both mean rejected credentials.
async fn parse_auth_response(response: Response) -> Result<String> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
        return Err(BackendError::Auth);
    }

    let response = check_response(response, &[StatusCode::OK]).await?;
    let auth: super::types::AuthResponse = decode(response, "auth").await?;

    if auth.jwt.is_empty() {
        return Err(BackendError::Protocol {
            status: status.as_u16(),
            body: "authentication response contained no token".to_string(),
        });
    }

    Ok(auth.jwt)
}

async fn parse_containers(response: Response) -> Result<Vec<Container>> {
    let raw: Vec<RawContainer> = decode(response, "container listing").await?;
    Ok(raw.into_iter().map(RawContainer::summarize).collect())
}

async fn decode<T: DeserializeOwned>(response: Response, what: &'static str) -> Result<T> {
    let body = response.text().await.map_err(BackendError::Connection)?;
    serde_json::from_str(&body).map_err(|source| BackendError::Decode { what, source })
}

fn select_endpoint(endpoints: &[EndpointRecord]) -> Result<i64> {
    endpoints
        .first()
        .map(|endpoint| endpoint.id)
        .ok_or(BackendError::NoEndpoints)
}

//! Wire types for the Portainer REST API. Field names follow the remote's
//! casing exactly; everything crossing the network is an explicit record
//! rather than an ad hoc JSON tree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Container, DeployOptions};

/// Protocol applied to a port mapping that does not specify one
pub const DEFAULT_PROTOCOL: &str = "tcp";

/// One entry in the control plane's environment listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRecord {
    #[serde(rename = "Id")]
    pub id: i64,
}

/// Raw container record as returned by the containers listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawContainer {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

impl RawContainer {
    /// Normalizes a raw record into the canonical model: first name with the
    /// leading `/` stripped (literal "unknown" when the name list is empty),
    /// id truncated to the 12-character short form.
    pub fn summarize(self) -> Container {
        let name = self
            .names
            .first()
            .map(|name| name.trim_start_matches('/').to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Container {
            id: short_id(&self.id),
            name,
            image: self.image,
            state: self.state,
            status: self.status,
        }
    }
}

/// First 12 characters of a raw identifier; shorter input passes through whole.
pub fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

/// Body of the create-container call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateContainerRequest {
    pub image: String,
    pub exposed_ports: HashMap<String, ExposedPort>,
    pub env: Vec<String>,
    pub host_config: HostConfig,
}

/// Marker value in the exposed-ports set; serializes to an empty object
#[derive(Debug, Clone, Serialize)]
pub struct ExposedPort {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostConfig {
    pub port_bindings: HashMap<String, Vec<PortBinding>>,
    pub restart_policy: RestartPolicy,
    pub auto_remove: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortBinding {
    pub host_port: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestartPolicy {
    pub name: String,
}

impl CreateContainerRequest {
    /// Builds the create payload from deploy options.
    ///
    /// Exposed ports and bindings are keyed by `<container_port>/<protocol>`;
    /// a mapping repeating the same (port, protocol) pair overwrites the
    /// earlier binding. Env map iteration order is unspecified, so the
    /// submitted list order is too.
    pub fn from_options(opts: &DeployOptions) -> Self {
        let mut exposed_ports = HashMap::new();
        let mut port_bindings = HashMap::new();

        for mapping in &opts.ports {
            let protocol = if mapping.protocol.is_empty() {
                DEFAULT_PROTOCOL
            } else {
                mapping.protocol.as_str()
            };
            let key = format!("{}/{}", mapping.container_port, protocol);

            exposed_ports.insert(key.clone(), ExposedPort {});
            port_bindings.insert(
                key,
                vec![PortBinding {
                    host_port: mapping.host_port.clone(),
                }],
            );
        }

        let env = opts
            .env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        Self {
            image: opts.image.clone(),
            exposed_ports,
            env,
            host_config: HostConfig {
                port_bindings,
                restart_policy: RestartPolicy {
                    name: opts.restart.clone(),
                },
                auto_remove: opts.auto_remove,
            },
        }
    }
}

/// Response of the create-container call
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedContainer {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Warnings", default)]
    pub warnings: Vec<String>,
}

/// Body of the stack-creation call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackCreateRequest {
    pub name: String,
    pub stack_file_content: String,
    pub env: Vec<StackEnv>,
}

/// Stack-level environment entry; the env list is always submitted empty
#[derive(Debug, Clone, Serialize)]
pub struct StackEnv {
    pub name: String,
    pub value: String,
}

impl StackCreateRequest {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack_file_content: content.into(),
            env: Vec::new(),
        }
    }
}

/// Response of the stack-creation call
#[derive(Debug, Clone, Deserialize)]
pub struct StackRecord {
    #[serde(rename = "Id")]
    pub id: i64,
}

/// Body of the login exchange
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Response of the login exchange
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub jwt: String,
}

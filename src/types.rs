use std::collections::HashMap;

/// Canonical view of a container on the remote host.
///
/// Produced only by normalizing raw control-plane records; `id` is always the
/// 12-character short form of the full identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub status: String,
}

/// A single host-to-container port binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: String,
    pub container_port: String,
    /// "tcp" or "udp"; an empty string is treated as "tcp"
    pub protocol: String,
}

/// Parameters for deploying a single container
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Container name; the remote generates one when absent
    pub name: Option<String>,
    /// Image reference, e.g. "nginx:latest"
    pub image: String,
    pub ports: Vec<PortMapping>,
    pub env: HashMap<String, String>,
    /// Restart policy, e.g. "unless-stopped"
    pub restart: String,
    /// Remove the container once it stops
    pub auto_remove: bool,
}

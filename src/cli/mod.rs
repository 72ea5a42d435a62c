use clap::{Parser, Subcommand};
use std::collections::HashMap;

use tether::{BackendError, PortMapping, Result};

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Deploy Docker containers to remote hosts via a Portainer-compatible control plane")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate with the control plane and save the session
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (prompted securely when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all containers on the remote host
    Status,

    /// Deploy a new container to the remote host
    Deploy {
        /// Image to deploy, e.g. nginx:latest
        #[arg(long)]
        image: String,

        /// Container name (the remote generates one when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Port mappings (HOST:CONTAINER[/PROTOCOL], repeatable)
        #[arg(short, long = "port")]
        ports: Vec<String>,

        /// Environment variables (KEY=VALUE, repeatable)
        #[arg(short, long = "env")]
        env: Vec<String>,

        /// Restart policy (no, always, unless-stopped, on-failure)
        #[arg(long, default_value = "unless-stopped")]
        restart: String,

        /// Remove the container automatically when it stops
        #[arg(long = "rm")]
        auto_remove: bool,
    },

    /// Start a stopped container
    Start {
        /// Container ID or name
        container: String,
    },

    /// Stop a running container
    Stop {
        /// Container ID or name
        container: String,
    },

    /// Remove a container
    Rm {
        /// Container ID or name
        container: String,

        /// Force removal even if the container is running
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy a compose file as a multi-service stack
    Compose {
        /// Path to the compose file
        #[arg(short, long)]
        file: String,

        /// Stack name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Parses repeated `--port HOST:CONTAINER[/PROTOCOL]` flags into port
/// mappings. Rejected syntax never reaches the network.
pub fn parse_ports(specs: &[String]) -> Result<Vec<PortMapping>> {
    let mut mappings = Vec::with_capacity(specs.len());

    for spec in specs {
        let bad_spec = || {
            BackendError::validation(format!(
                "port must be in format HOST:CONTAINER[/PROTOCOL] (got: {spec})"
            ))
        };

        let (host, rest) = spec.split_once(':').ok_or_else(bad_spec)?;
        let (container, protocol) = match rest.split_once('/') {
            Some((container, protocol)) => (container, protocol),
            None => (rest, "tcp"),
        };

        if host.is_empty()
            || container.is_empty()
            || protocol.is_empty()
            || host.contains(':')
            || container.contains(':')
        {
            return Err(bad_spec());
        }

        mappings.push(PortMapping {
            host_port: host.to_string(),
            container_port: container.to_string(),
            protocol: protocol.to_string(),
        });
    }

    Ok(mappings)
}

/// Parses repeated `--env KEY=VALUE` flags into an environment map. A key
/// given twice keeps the last value.
pub fn parse_env(specs: &[String]) -> Result<HashMap<String, String>> {
    let mut env = HashMap::new();

    for spec in specs {
        let (key, value) = spec.split_once('=').ok_or_else(|| {
            BackendError::validation(format!("env var must be in format KEY=VALUE (got: {spec})"))
        })?;

        if key.is_empty() {
            return Err(BackendError::validation(format!(
                "env var must be in format KEY=VALUE (got: {spec})"
            )));
        }

        env.insert(key.to_string(), value.to_string());
    }

    Ok(env)
}

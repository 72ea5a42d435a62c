//! Tether - remote container deployment through a control-plane API
//!
//! This crate provides a capability contract for container-lifecycle
//! management on remote Docker hosts, and a concrete adapter that speaks the
//! REST API of a Portainer-compatible control plane: endpoint discovery,
//! authenticated requests, typed JSON payloads, response classification, and
//! normalization of remote records into a canonical container model.

pub mod backend;
pub mod config;
pub mod error;
pub mod portainer;
pub mod types;

pub use backend::Backend;
pub use error::{BackendError, Result};
pub use portainer::PortainerClient;

// Export main types at root level
pub use types::{Container, DeployOptions, PortMapping};

//! Adapter for Portainer-compatible control planes.
//!
//! Translates the backend contract into authenticated REST calls: endpoint
//! discovery, typed payload construction, response classification, and
//! normalization of remote records into the canonical container model.

pub mod client;
pub mod types;

pub use client::{PortainerClient, authenticate};

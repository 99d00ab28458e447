//! Service crate for the uAsset gateway.
//!
//! Wires configuration, the network registry and the HTTP API together and
//! provides the `uasset-gateway` binary.
//!
//! # Components
//!
//! - `api`: axum router, request validation and envelope status mapping
//! - `cli`: command-line interface
//! - `service`: query orchestration over the network registry

pub mod api;
pub mod cli;
pub mod service;

pub use api::{create_router, AppState};
pub use service::QueryService;

//! Shared types for the uAsset gateway.
//!
//! This crate holds everything the other workspace members agree on: the
//! normalized data model returned to API callers, the response envelope, the
//! `ChainProvider` capability trait implemented per blockchain family, the
//! error taxonomy, and the pure request validators.

pub mod api;
pub mod chains;
pub mod errors;
pub mod models;
pub mod units;
pub mod validation;

pub use api::*;
pub use chains::*;
pub use errors::*;
pub use models::*;

//! API types for the gateway HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uniform response shape of every API operation.
///
/// Build it with [`ResponseEnvelope::ok`] or [`ResponseEnvelope::err`]; a
/// successful envelope never carries an error and a failed one never carries
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	pub timestamp: DateTime<Utc>,
}

impl<T> ResponseEnvelope<T> {
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			error: None,
			timestamp: Utc::now(),
		}
	}

	pub fn err(message: impl Into<String>) -> Self {
		Self {
			success: false,
			data: None,
			error: Some(message.into()),
			timestamp: Utc::now(),
		}
	}

	pub fn from_result<E: std::fmt::Display>(result: std::result::Result<T, E>) -> Self {
		match result {
			Ok(data) => Self::ok(data),
			Err(e) => Self::err(e.to_string()),
		}
	}
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	pub timestamp: DateTime<Utc>,
	pub version: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
	pub message: String,
	pub version: String,
	pub endpoints: ServiceEndpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	pub health: String,
	pub uasset: String,
}

/// Body of `POST /{networkId}/estimate-gas`. Fields are optional so that a
/// missing one can be reported with the gateway's own message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateGasBody {
	#[serde(default)]
	pub from: Option<String>,
	#[serde(default)]
	pub to: Option<String>,
	#[serde(default)]
	pub amount: Option<String>,
}

/// Query string of `GET /networks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworksQuery {
	#[serde(default)]
	pub family: Option<String>,
}

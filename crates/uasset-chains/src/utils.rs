//! Utility types shared by the RPC client implementations.
//!
//! Every round trip to a chain node goes through [`with_timeout`] so a stalled
//! endpoint cannot hold a request open indefinitely.

use std::{future::Future, time::Duration};
use thiserror::Error;
use tracing::warn;
use uasset_types::GatewayError;

/// Default bound on a single RPC round trip.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single RPC round trip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
	/// The node rejected the request or could not be reached.
	#[error("{0}")]
	Transport(String),
	#[error("RPC request timed out after {0:?}")]
	Timeout(Duration),
	/// The node answered with something that is not the expected shape.
	#[error("Malformed RPC response: {0}")]
	Decode(String),
}

impl From<RpcError> for GatewayError {
	fn from(err: RpcError) -> Self {
		GatewayError::Provider(err.to_string())
	}
}

/// Runs one RPC future, failing with [`RpcError::Timeout`] once `limit` elapses.
pub async fn with_timeout<T, F>(limit: Duration, method: &str, fut: F) -> Result<T, RpcError>
where
	F: Future<Output = Result<T, RpcError>>,
{
	match tokio::time::timeout(limit, fut).await {
		Ok(result) => result,
		Err(_) => {
			warn!("RPC call {} timed out after {:?}", method, limit);
			Err(RpcError::Timeout(limit))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_with_timeout_passes_result_through() {
		let result = with_timeout(Duration::from_secs(1), "eth_call", async {
			Ok::<_, RpcError>(42u64)
		})
		.await;
		assert_eq!(result, Ok(42));
	}

	#[tokio::test(start_paused = true)]
	async fn test_with_timeout_expires() {
		let result: Result<(), RpcError> =
			with_timeout(Duration::from_millis(50), "getTransaction", async {
				tokio::time::sleep(Duration::from_secs(60)).await;
				Ok(())
			})
			.await;
		assert_eq!(result, Err(RpcError::Timeout(Duration::from_millis(50))));
	}

	#[test]
	fn test_rpc_error_maps_to_provider_error() {
		let err: GatewayError = RpcError::Decode("expected string".into()).into();
		assert_eq!(
			err,
			GatewayError::Provider("Malformed RPC response: expected string".into())
		);
	}
}

//! Error types for the gateway.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
	#[error("Provider not found for network: {0}")]
	NetworkNotFound(String),

	#[error("{0}")]
	Validation(String),

	#[error("{0}")]
	AssetNotFound(String),

	#[error("Transaction not found")]
	TransactionNotFound,

	#[error("Failed to estimate gas: {0}")]
	GasEstimationFailed(String),

	#[error("{0}")]
	Provider(String),

	#[error("Configuration error: {0}")]
	Config(String),
}

impl GatewayError {
	/// Whether the failure was caught before any RPC call was made.
	pub fn is_request_error(&self) -> bool {
		matches!(self, Self::NetworkNotFound(_) | Self::Validation(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_messages() {
		assert_eq!(
			GatewayError::NetworkNotFound("arbitrum".into()).to_string(),
			"Provider not found for network: arbitrum"
		);
		assert_eq!(
			GatewayError::TransactionNotFound.to_string(),
			"Transaction not found"
		);
		assert_eq!(
			GatewayError::GasEstimationFailed("insufficient funds".into()).to_string(),
			"Failed to estimate gas: insufficient funds"
		);
	}

	#[test]
	fn test_request_error_classification() {
		assert!(GatewayError::Validation("bad".into()).is_request_error());
		assert!(GatewayError::NetworkNotFound("x".into()).is_request_error());
		assert!(!GatewayError::Provider("boom".into()).is_request_error());
		assert!(!GatewayError::TransactionNotFound.is_request_error());
	}
}

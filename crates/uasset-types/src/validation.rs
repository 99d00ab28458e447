//! Syntactic request validation, dispatched by network family.
//!
//! These checks run before any provider call so malformed input is rejected
//! without spending RPC quota. They perform no I/O.

use crate::models::BlockchainFamily;
use alloy::primitives::Address;
use std::str::FromStr;

/// Byte length of a Solana public key.
const SOLANA_PUBKEY_LEN: usize = 32;
/// Byte length of a Solana transaction signature.
const SOLANA_SIGNATURE_LEN: usize = 64;

/// Checks `value` is a well-formed address for the network's family.
pub fn is_valid_address(value: &str, network_id: &str) -> bool {
	match BlockchainFamily::for_network_id(network_id) {
		BlockchainFamily::Solana => is_valid_solana_pubkey(value),
		BlockchainFamily::Evm => is_valid_evm_address(value),
	}
}

/// Checks `value` is a well-formed transaction id for the network's family.
pub fn is_valid_hash(value: &str, network_id: &str) -> bool {
	match BlockchainFamily::for_network_id(network_id) {
		BlockchainFamily::Solana => base58_len(value) == Some(SOLANA_SIGNATURE_LEN),
		BlockchainFamily::Evm => is_hex_with_prefix(value, 64),
	}
}

/// `0x` followed by 40 hex characters. All-lowercase and all-uppercase forms
/// are accepted as is; mixed case must carry a valid EIP-55 checksum.
pub fn is_valid_evm_address(value: &str) -> bool {
	if !is_hex_with_prefix(value, 40) {
		return false;
	}

	let body = &value[2..];
	let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
	let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
	if !(has_lower && has_upper) {
		return true;
	}

	match Address::from_str(value) {
		Ok(address) => address.to_checksum(None) == value,
		Err(_) => false,
	}
}

/// Base58 string that decodes to a 32-byte public key.
pub fn is_valid_solana_pubkey(value: &str) -> bool {
	base58_len(value) == Some(SOLANA_PUBKEY_LEN)
}

fn is_hex_with_prefix(value: &str, hex_len: usize) -> bool {
	match value.strip_prefix("0x") {
		Some(body) => body.len() == hex_len && body.bytes().all(|b| b.is_ascii_hexdigit()),
		None => false,
	}
}

fn base58_len(value: &str) -> Option<usize> {
	if value.is_empty() {
		return None;
	}
	bs58::decode(value).into_vec().ok().map(|bytes| bytes.len())
}

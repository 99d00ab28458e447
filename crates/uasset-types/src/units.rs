//! Base-unit conversions.
//!
//! Balances are never converted through floating point. The decimal point is
//! placed by shifting the base-10 digits of the exact integer value.

use alloy::primitives::U256;

/// Formats a raw base-unit amount as a decimal string with `decimals`
/// fractional digits, trimming trailing zeros (`10^18` with 18 decimals is `"1"`).
pub fn format_units(raw: U256, decimals: u8) -> String {
	let digits = raw.to_string();
	let decimals = decimals as usize;
	if decimals == 0 {
		return digits;
	}

	let padded = if digits.len() <= decimals {
		format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
	} else {
		digits
	};

	let (whole, fraction) = padded.split_at(padded.len() - decimals);
	let fraction = fraction.trim_end_matches('0');
	if fraction.is_empty() {
		whole.to_string()
	} else {
		format!("{}.{}", whole, fraction)
	}
}

/// Parses a non-negative base-10 integer string such as a token amount
/// reported by an RPC node.
pub fn parse_base_units(value: &str) -> Result<U256, String> {
	if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
		return Err(format!("Invalid integer amount: {:?}", value));
	}
	U256::from_str_radix(value, 10).map_err(|e| format!("Invalid integer amount {}: {}", value, e))
}
